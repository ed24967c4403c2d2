//! Turn orchestration.
//!
//! A turn runs `AwaitingUserInput -> Submitting -> Displaying ->
//! AwaitingUserInput`. Every transition takes `&mut self` and is awaited to
//! completion, so a second prompt cannot start while one is in flight.

use tracing::{debug, info, warn};

use crate::api::{Backend, BackendError, Connectivity, LoadOutcome, ModelCatalog};
use crate::core::message::Role;
use crate::core::prompt::{self, DEFAULT_WINDOW};
use crate::core::reveal::{self, Pacing};
use crate::core::session::SessionState;
use crate::ui::{NoticeKind, Presenter};

pub const NO_MODEL_WARNING: &str = "Please load a model first.";
pub const BUSY_WARNING: &str = "A response is still being generated.";
pub const RESET_NOTICE: &str = "Chat has been reset.";
pub const CONNECTED_NOTICE: &str = "Connected to the server.";
pub const UNEXPECTED_PING_NOTICE: &str = "Server is running but returned unexpected response.";
pub const UNREACHABLE_NOTICE: &str = "Could not connect to the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingUserInput,
    Submitting,
    Displaying,
}

#[derive(Debug)]
pub enum TurnOutcome {
    /// The reply was appended and fully displayed.
    Replied,
    /// The request failed; the user message stays without a reply.
    Failed(BackendError),
    /// Nothing is loaded on the server, so nothing was sent.
    NoModelLoaded,
    /// A previous turn still holds the input lock.
    Busy,
    /// Blank input.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub window: usize,
    pub pacing: Pacing,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            pacing: Pacing::default(),
        }
    }
}

pub struct ChatController<B, P> {
    backend: B,
    presenter: P,
    session: SessionState,
    state: TurnState,
    settings: ControllerSettings,
}

impl<B: Backend, P: Presenter> ChatController<B, P> {
    pub fn new(backend: B, presenter: P, settings: ControllerSettings) -> Self {
        Self {
            backend,
            presenter,
            session: SessionState::new(),
            state: TurnState::AwaitingUserInput,
            settings,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    fn enter(&mut self, state: TurnState) {
        self.state = state;
        self.presenter.render(state, &self.session);
    }

    /// Run one full turn for `input`.
    pub async fn submit(&mut self, input: &str) -> TurnOutcome {
        if input.trim().is_empty() {
            return TurnOutcome::Ignored;
        }

        if self.state != TurnState::AwaitingUserInput || self.session.is_locked() {
            self.presenter.notice(NoticeKind::Warning, BUSY_WARNING);
            return TurnOutcome::Busy;
        }

        if !self.session.has_loaded_model() {
            self.presenter.notice(NoticeKind::Warning, NO_MODEL_WARNING);
            return TurnOutcome::NoModelLoaded;
        }

        if let Err(err) = self.session.append_message(Role::User, input) {
            self.presenter.notice(NoticeKind::Warning, &err.to_string());
            return TurnOutcome::Busy;
        }
        self.session.set_lock(true);
        self.enter(TurnState::Submitting);

        let assembled = prompt::assemble(self.session.messages(), self.settings.window);
        debug!(chars = assembled.len(), "assembled prompt");

        let reply = match self.backend.submit_prompt(&assembled).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "turn failed");
                self.presenter
                    .notice(NoticeKind::Error, &submission_failure_text(&err));
                self.session.set_lock(false);
                self.enter(TurnState::AwaitingUserInput);
                return TurnOutcome::Failed(err);
            }
        };

        if let Err(err) = self.session.append_message(Role::Assistant, reply.as_str()) {
            warn!(error = %err, "assistant reply refused");
        }
        self.enter(TurnState::Displaying);

        let presenter = &mut self.presenter;
        reveal::play(&reply, self.settings.pacing, |frame| presenter.reveal(frame)).await;

        self.session.set_lock(false);
        self.enter(TurnState::AwaitingUserInput);
        TurnOutcome::Replied
    }

    /// Clear the conversation. Allowed in any state; lock and loaded model
    /// are untouched.
    pub fn reset(&mut self) {
        self.session.reset();
        info!("conversation reset");
        self.presenter.notice(NoticeKind::Success, RESET_NOTICE);
        self.presenter.render(self.state, &self.session);
    }

    pub async fn check_connection(&mut self) -> Connectivity {
        let connectivity = self.backend.ping().await;
        match &connectivity {
            Connectivity::Connected => {
                self.presenter.notice(NoticeKind::Success, CONNECTED_NOTICE);
            }
            Connectivity::Unexpected(body) => {
                debug!(body = %body, "unexpected ping body");
                self.presenter
                    .notice(NoticeKind::Warning, UNEXPECTED_PING_NOTICE);
            }
            Connectivity::Unreachable(reason) => {
                debug!(reason = %reason, "server unreachable");
                self.presenter.notice(NoticeKind::Error, UNREACHABLE_NOTICE);
            }
        }
        connectivity
    }

    /// Fetch the model list and mirror the server's loaded model into the
    /// session. On failure the session is left as it was.
    pub async fn refresh_models(&mut self) -> Result<ModelCatalog, BackendError> {
        match self.backend.list_models().await {
            Ok(catalog) => {
                self.session.set_loaded_model(catalog.loaded_model.clone());
                self.presenter.render(self.state, &self.session);
                Ok(catalog)
            }
            Err(err) => {
                warn!(error = %err, "listing models failed");
                self.presenter.notice(failure_kind(&err), &failure_text(&err));
                Err(err)
            }
        }
    }

    /// Ask the server to load `name`. Only a confirmed load changes the
    /// session's loaded model.
    pub async fn load_model(&mut self, name: &str) -> Result<LoadOutcome, BackendError> {
        match self.backend.load_model(name).await {
            Ok(LoadOutcome::Loaded(message)) => {
                info!(model = name, "model loaded");
                self.session.set_loaded_model(Some(name.to_string()));
                self.presenter.notice(NoticeKind::Success, &message);
                self.presenter.render(self.state, &self.session);
                Ok(LoadOutcome::Loaded(message))
            }
            Ok(LoadOutcome::Rejected(message)) => {
                warn!(model = name, message = %message, "model load rejected");
                self.presenter.notice(NoticeKind::Warning, &message);
                Ok(LoadOutcome::Rejected(message))
            }
            Err(err) => {
                warn!(model = name, error = %err, "model load failed");
                self.presenter.notice(failure_kind(&err), &failure_text(&err));
                Err(err)
            }
        }
    }
}

fn failure_kind(err: &BackendError) -> NoticeKind {
    if err.is_unreachable() {
        NoticeKind::Error
    } else {
        NoticeKind::Warning
    }
}

fn failure_text(err: &BackendError) -> String {
    if err.is_unreachable() {
        UNREACHABLE_NOTICE.to_string()
    } else {
        err.to_string()
    }
}

fn submission_failure_text(err: &BackendError) -> String {
    match err {
        BackendError::Status { message, .. } => format!("Request failed: {message}"),
        other => format!("An error has occurred in the request: {other}"),
    }
}
