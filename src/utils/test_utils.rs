use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{Backend, BackendError, Connectivity, LoadOutcome, ModelCatalog};
use crate::core::controller::{ChatController, ControllerSettings, TurnState};
use crate::core::message::Message;
use crate::core::reveal::{Pacing, RevealFrame};
use crate::core::session::SessionState;
use crate::ui::{NoticeKind, Presenter};

/// In-memory backend answering from queued results.
#[derive(Default)]
pub struct ScriptedBackend {
    pub connectivity: Mutex<Option<Connectivity>>,
    pub catalogs: Mutex<VecDeque<Result<ModelCatalog, BackendError>>>,
    pub loads: Mutex<VecDeque<Result<LoadOutcome, BackendError>>>,
    pub replies: Mutex<VecDeque<Result<String, BackendError>>>,
    pub prompts: Mutex<Vec<String>>,
    pub loaded_names: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: Result<String, BackendError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_catalog(self, catalog: Result<ModelCatalog, BackendError>) -> Self {
        self.catalogs.lock().unwrap().push_back(catalog);
        self
    }

    pub fn with_load(self, outcome: Result<LoadOutcome, BackendError>) -> Self {
        self.loads.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_connectivity(self, connectivity: Connectivity) -> Self {
        *self.connectivity.lock().unwrap() = Some(connectivity);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn ping(&self) -> Connectivity {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.connectivity
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Connectivity::Connected)
    }

    async fn list_models(&self) -> Result<ModelCatalog, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.catalogs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ModelCatalog::default()))
    }

    async fn load_model(&self, name: &str) -> Result<LoadOutcome, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.loaded_names.lock().unwrap().push(name.to_string());
        self.loads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(LoadOutcome::Loaded(format!("Loaded model: {name}"))))
    }

    async fn submit_prompt(&self, prompt: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("no scripted reply".to_string())))
    }
}

/// Everything a presenter was told, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    Notice(NoticeKind, String),
    Render {
        state: TurnState,
        locked: bool,
        messages: Vec<Message>,
        loaded_model: Option<String>,
    },
    Reveal(RevealFrame),
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Notice(kind, text) => Some((*kind, text.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn lock_history(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Render { locked, .. } => Some(*locked),
                _ => None,
            })
            .collect()
    }

    pub fn states(&self) -> Vec<TurnState> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Render { state, .. } => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn reveals(&self) -> Vec<RevealFrame> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Reveal(frame) => Some(frame.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn notice(&mut self, kind: NoticeKind, text: &str) {
        self.events.push(PresenterEvent::Notice(kind, text.to_string()));
    }

    fn render(&mut self, state: TurnState, session: &SessionState) {
        self.events.push(PresenterEvent::Render {
            state,
            locked: session.is_locked(),
            messages: session.messages().to_vec(),
            loaded_model: session.loaded_model().map(str::to_string),
        });
    }

    fn reveal(&mut self, frame: &RevealFrame) {
        self.events.push(PresenterEvent::Reveal(frame.clone()));
    }
}

pub fn instant_settings() -> ControllerSettings {
    ControllerSettings {
        pacing: Pacing::Instant,
        ..ControllerSettings::default()
    }
}

pub fn create_test_controller(
    backend: ScriptedBackend,
) -> ChatController<ScriptedBackend, RecordingPresenter> {
    ChatController::new(backend, RecordingPresenter::default(), instant_settings())
}

/// Controller whose session already reports `model` as loaded.
pub async fn create_loaded_controller(
    backend: ScriptedBackend,
    model: &str,
) -> ChatController<ScriptedBackend, RecordingPresenter> {
    backend.catalogs.lock().unwrap().push_front(Ok(ModelCatalog {
        loaded_model: Some(model.to_string()),
        models: vec![model.to_string()],
    }));
    let mut controller = create_test_controller(backend);
    controller
        .refresh_models()
        .await
        .expect("scripted catalog should load");
    controller.presenter_mut().events.clear();
    controller.backend().calls.store(0, Ordering::SeqCst);
    controller
}
