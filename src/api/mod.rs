use serde::Deserialize;

pub mod backend;

pub use backend::{
    Backend, BackendError, Connectivity, HttpBackend, LoadOutcome, ModelCatalog,
};

/// Body of `GET /get-models`.
#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    pub loaded_model: Option<String>,
    pub model_list: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Success,
    Error,
}

/// Body of `POST /load-model`.
#[derive(Debug, Deserialize)]
pub struct LoadModelResponse {
    pub status: LoadStatus,
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /chat`. Error responses reuse the same field for the
/// failure text.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatErrorResponse {
    pub response: Option<String>,
}
