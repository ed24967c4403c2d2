//! One-shot "say" command: a single turn without the interactive loop.

use std::error::Error;
use std::time::Duration;

use crate::api::HttpBackend;
use crate::core::controller::{ChatController, ControllerSettings, TurnOutcome};
use crate::ui::terminal::TerminalPresenter;

pub async fn run_say(
    server_url: &str,
    connect_timeout: Option<Duration>,
    settings: ControllerSettings,
    prompt: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: llm-sampler say <prompt>");
        std::process::exit(1);
    }

    let backend = HttpBackend::with_connect_timeout(server_url, connect_timeout)?;
    let interactive = std::io::IsTerminal::is_terminal(&std::io::stdout());
    let presenter = TerminalPresenter::stdout(interactive);
    let mut controller = ChatController::new(backend, presenter, settings);

    // The session only learns which model is loaded from the listing.
    if controller.refresh_models().await.is_err() {
        std::process::exit(1);
    }

    match controller.submit(&prompt).await {
        TurnOutcome::Replied => Ok(()),
        TurnOutcome::Failed(_) | TurnOutcome::NoModelLoaded => std::process::exit(1),
        TurnOutcome::Busy | TurnOutcome::Ignored => Ok(()),
    }
}
