//! HTTP access to the sampling server.
//!
//! [`Backend`] is the seam the chat controller talks through; [`HttpBackend`]
//! is the reqwest implementation of the four endpoints the server exposes.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{
    ChatErrorResponse, ChatResponse, LoadModelResponse, LoadStatus, ModelsResponse,
};
use crate::utils::url::{construct_api_url, normalize_base_url};

pub const PING_ENDPOINT: &str = "ping";
pub const MODELS_ENDPOINT: &str = "get-models";
pub const LOAD_MODEL_ENDPOINT: &str = "load-model";
pub const CHAT_ENDPOINT: &str = "chat";

const PONG: &str = "pong";

/// Liveness of the server as reported by `/ping`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connectivity {
    Connected,
    /// Something answered, but not with `pong`.
    Unexpected(String),
    Unreachable(String),
}

impl Connectivity {
    pub fn is_connected(&self) -> bool {
        matches!(self, Connectivity::Connected)
    }
}

/// Models the server offers and the one it currently has active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    pub loaded_model: Option<String>,
    pub models: Vec<String>,
}

/// Result of a load request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(String),
    /// The server refused the load (unknown name, out of memory, ...).
    Rejected(String),
}

#[derive(Debug)]
pub enum BackendError {
    /// The connection could not be established.
    Unreachable(String),

    /// The server answered with a non-success status.
    Status {
        status: StatusCode,
        message: String,
    },

    /// The body did not match the expected shape.
    Malformed {
        endpoint: &'static str,
        source: serde_json::Error,
    },

    /// Any other failure while sending the request or reading the body.
    Transport(String),
}

impl BackendError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_connect() {
            BackendError::Unreachable(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, BackendError::Unreachable(_))
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unreachable(reason) => {
                write!(f, "Could not connect to the server: {reason}")
            }
            BackendError::Status { status, message } => {
                write!(f, "Server returned {status}: {message}")
            }
            BackendError::Malformed { endpoint, source } => {
                write!(f, "Unexpected response from /{endpoint}: {source}")
            }
            BackendError::Transport(reason) => write!(f, "{reason}"),
        }
    }
}

impl StdError for BackendError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            BackendError::Malformed { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Never fails; connection problems come back as
    /// [`Connectivity::Unreachable`].
    async fn ping(&self) -> Connectivity;

    async fn list_models(&self) -> Result<ModelCatalog, BackendError>;

    async fn load_model(&self, name: &str) -> Result<LoadOutcome, BackendError>;

    /// Send an assembled prompt and return the generated text. One attempt,
    /// no retry.
    async fn submit_prompt(&self, prompt: &str) -> Result<String, BackendError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    /// Build a backend with a fresh client, applying `connect_timeout` when
    /// one is configured.
    pub fn with_connect_timeout(
        base_url: &str,
        connect_timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build().map_err(BackendError::from_reqwest)?;
        Ok(Self::new(client, base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        construct_api_url(&self.base_url, endpoint)
    }

    async fn read_json<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await.map_err(BackendError::from_reqwest)?;
        debug!(endpoint, %status, body = %body, "backend response");

        if !status.is_success() {
            return Err(BackendError::Status {
                status,
                message: body.trim().to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|source| BackendError::Malformed { endpoint, source })
    }
}

/// Pull the failure text out of a non-success `/chat` body, falling back to
/// the raw body when it is not the usual `{"response": ...}` shape.
fn chat_error_message(body: &str) -> String {
    serde_json::from_str::<ChatErrorResponse>(body)
        .ok()
        .and_then(|parsed| parsed.response)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "<empty body>".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn ping(&self) -> Connectivity {
        let response = match self.client.get(self.url(PING_ENDPOINT)).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "ping failed");
                return Connectivity::Unreachable(err.to_string());
            }
        };

        match response.text().await {
            Ok(body) if body == PONG => Connectivity::Connected,
            Ok(body) => Connectivity::Unexpected(body),
            Err(err) => Connectivity::Unexpected(err.to_string()),
        }
    }

    async fn list_models(&self) -> Result<ModelCatalog, BackendError> {
        let response = self
            .client
            .get(self.url(MODELS_ENDPOINT))
            .send()
            .await
            .map_err(BackendError::from_reqwest)?;

        let parsed: ModelsResponse = Self::read_json(MODELS_ENDPOINT, response).await?;
        Ok(ModelCatalog {
            loaded_model: parsed.loaded_model,
            models: parsed.model_list,
        })
    }

    async fn load_model(&self, name: &str) -> Result<LoadOutcome, BackendError> {
        let response = self
            .client
            .post(self.url(LOAD_MODEL_ENDPOINT))
            .form(&[("model_name", name)])
            .send()
            .await
            .map_err(BackendError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(BackendError::from_reqwest)?;
        debug!(endpoint = LOAD_MODEL_ENDPOINT, %status, body = %body, "backend response");

        // The server reports load failures in the body, often with a 5xx status.
        let parsed: LoadModelResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(BackendError::Status {
                    status,
                    message: body.trim().to_string(),
                })
            }
            Err(source) => {
                return Err(BackendError::Malformed {
                    endpoint: LOAD_MODEL_ENDPOINT,
                    source,
                })
            }
        };
        Ok(match parsed.status {
            LoadStatus::Success => LoadOutcome::Loaded(parsed.message),
            LoadStatus::Error => LoadOutcome::Rejected(parsed.message),
        })
    }

    async fn submit_prompt(&self, prompt: &str) -> Result<String, BackendError> {
        debug!(prompt = %prompt, "prompt sent to backend");
        let response = self
            .client
            .post(self.url(CHAT_ENDPOINT))
            .form(&[("prompt", prompt)])
            .send()
            .await
            .map_err(BackendError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(BackendError::from_reqwest)?;

        if status != StatusCode::OK {
            let message = chat_error_message(&body);
            warn!(%status, message = %message, "chat request failed");
            return Err(BackendError::Status { status, message });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|source| {
            BackendError::Malformed {
                endpoint: CHAT_ENDPOINT,
                source,
            }
        })?;
        debug!(response = %parsed.response, "backend response");
        Ok(parsed.response)
    }
}
