use crate::core::message::{Message, Role};
use std::error::Error as StdError;
use std::fmt;

/// Refusals raised by [`SessionState`] when an operation would break the
/// input-lock invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// A user message arrived while a turn was still in flight.
    InputLocked,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InputLocked => {
                write!(f, "input is locked until the current response finishes")
            }
        }
    }
}

impl StdError for SessionError {}

/// Conversation log, input lock and loaded model for one chat session.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    messages: Vec<Message>,
    input_locked: bool,
    loaded_model: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_locked(&self) -> bool {
        self.input_locked
    }

    pub fn loaded_model(&self) -> Option<&str> {
        self.loaded_model.as_deref()
    }

    pub fn has_loaded_model(&self) -> bool {
        self.loaded_model.is_some()
    }

    /// Append a message to the log.
    ///
    /// User messages are refused while the input lock is held; assistant
    /// messages are the reply that completes a locked turn and are always
    /// accepted.
    pub fn append_message(
        &mut self,
        role: Role,
        content: impl Into<String>,
    ) -> Result<(), SessionError> {
        if role.is_user() && self.input_locked {
            return Err(SessionError::InputLocked);
        }
        self.messages.push(Message::new(role, content));
        Ok(())
    }

    /// Drop every message. Lock and loaded model are left as they are.
    pub fn reset(&mut self) {
        self.messages.clear();
    }

    pub fn set_lock(&mut self, locked: bool) {
        self.input_locked = locked;
    }

    pub fn set_loaded_model(&mut self, model: Option<String>) {
        self.loaded_model = model;
    }
}
