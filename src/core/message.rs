use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
}

/// A single transcript entry. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Returned when a role string names neither side of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRole(pub String);

impl fmt::Display for InvalidRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid message role: {}", self.0)
    }
}

impl StdError for InvalidRole {}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_assistant(self) -> bool {
        self == Role::Assistant
    }
}

impl TryFrom<&str> for Role {
    type Error = InvalidRole;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(InvalidRole(value.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = InvalidRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_strings_are_rejected() {
        let err = Role::try_from("system").unwrap_err();
        assert_eq!(err, InvalidRole("system".to_string()));
        assert_eq!(err.to_string(), "invalid message role: system");
    }

    #[test]
    fn roles_round_trip_through_their_wire_names() {
        assert_eq!(Role::try_from("user"), Ok(Role::User));
        assert_eq!(Role::try_from(String::from("assistant")), Ok(Role::Assistant));
        assert_eq!(String::from(Role::Assistant), "assistant");
    }

    #[test]
    fn deserializing_a_bad_role_fails_instead_of_defaulting() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"role":"narrator","content":"hi"}"#);
        assert!(result.is_err());

        let message: Message = serde_json::from_str(r#"{"role":"user","content":"hi"}"#)
            .expect("user role should parse");
        assert!(message.is_user());
        assert_eq!(message.content, "hi");
    }
}
