//! Interactive session driver: reads lines, dispatches commands and prompts
//! to the controller until `/quit` or end of input.

use std::error::Error;
use std::io::IsTerminal;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use crate::api::{Backend, HttpBackend};
use crate::commands::{help_text, parse_input, ChatCommand, ParsedInput};
use crate::core::controller::{ChatController, ControllerSettings};
use crate::core::reveal::Pacing;
use crate::ui::picker::ModelPicker;
use crate::ui::terminal::TerminalPresenter;
use crate::ui::{short_model_name, NoticeKind, Presenter};

pub struct ChatOptions {
    pub server_url: String,
    pub settings: ControllerSettings,
    pub connect_timeout: Option<std::time::Duration>,
    pub default_model: Option<String>,
}

/// Start the interactive chat on stdin/stdout.
pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let interactive = std::io::stdout().is_terminal();
    let mut settings = options.settings;
    if !interactive {
        settings.pacing = Pacing::Instant;
    }

    let backend = HttpBackend::with_connect_timeout(&options.server_url, options.connect_timeout)?;
    info!(server = backend.base_url(), "starting chat session");
    let presenter = TerminalPresenter::stdout(interactive);
    let mut controller = ChatController::new(backend, presenter, settings);

    let mut picker = start_session(&mut controller, options.default_model.as_deref()).await;
    controller
        .presenter_mut()
        .notice(NoticeKind::Info, "Type a message, or /help for commands.");

    let stdin = BufReader::new(tokio::io::stdin());
    run_session(&mut controller, &mut picker, stdin).await?;
    Ok(())
}

/// Connection check and model listing performed before the first prompt.
/// Loads `default_model` when the server has nothing loaded.
pub async fn start_session<B: Backend, P: Presenter>(
    controller: &mut ChatController<B, P>,
    default_model: Option<&str>,
) -> ModelPicker {
    if !controller.check_connection().await.is_connected() {
        return ModelPicker::default();
    }

    let mut picker = match controller.refresh_models().await {
        Ok(catalog) => ModelPicker::new(&catalog.models, catalog.loaded_model.as_deref()),
        Err(_) => ModelPicker::default(),
    };

    if controller.session().loaded_model().is_none() {
        if let Some(model) = default_model {
            let name = picker.resolve(model);
            let _ = controller.load_model(&name).await;
            picker = ModelPicker::new(
                &picker.items.iter().map(|i| i.id.clone()).collect::<Vec<_>>(),
                controller.session().loaded_model(),
            );
        }
    }
    picker
}

/// Process input lines until `/quit` or end of input.
pub async fn run_session<B, P, R>(
    controller: &mut ChatController<B, P>,
    picker: &mut ModelPicker,
    input: R,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    P: Presenter,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            ParsedInput::Prompt(prompt) => {
                controller.submit(&prompt).await;
            }
            ParsedInput::Invalid(reason) => {
                controller.presenter_mut().notice(NoticeKind::Warning, &reason);
            }
            ParsedInput::Command(ChatCommand::Quit) => break,
            ParsedInput::Command(command) => {
                handle_command(controller, picker, command).await;
            }
        }
    }
    Ok(())
}

async fn handle_command<B: Backend, P: Presenter>(
    controller: &mut ChatController<B, P>,
    picker: &mut ModelPicker,
    command: ChatCommand,
) {
    match command {
        ChatCommand::Help => {
            controller
                .presenter_mut()
                .notice(NoticeKind::Info, &help_text());
        }
        ChatCommand::Models => {
            if let Ok(catalog) = controller.refresh_models().await {
                *picker = ModelPicker::new(&catalog.models, catalog.loaded_model.as_deref());
                let listing = if picker.is_empty() {
                    "The server offers no models.".to_string()
                } else {
                    format!("Models (* = loaded):\n{}", picker.lines().join("\n"))
                };
                controller.presenter_mut().notice(NoticeKind::Info, &listing);
            }
        }
        ChatCommand::Load(arg) => {
            let name = picker.resolve(&arg);
            let _ = controller.load_model(&name).await;
        }
        ChatCommand::Reset => controller.reset(),
        ChatCommand::Status => {
            controller.check_connection().await;
            let loaded = controller
                .session()
                .loaded_model()
                .map(|model| format!("Model loaded: {}", short_model_name(model)))
                .unwrap_or_else(|| "Model loaded: none".to_string());
            controller.presenter_mut().notice(NoticeKind::Info, &loaded);
        }
        ChatCommand::Quit => {}
    }
}
