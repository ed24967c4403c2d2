//! Prompt assembly for the completion-style `/chat` endpoint.
//!
//! The backend receives a single flat string rather than a message array, so
//! the recent history is rendered into tagged blocks behind a fixed system
//! preamble and followed by an empty assistant tag the model continues from.

use crate::core::message::{Message, Role};

/// Number of most recent messages included when no window is configured.
pub const DEFAULT_WINDOW: usize = 20;

pub const USER_TAG: &str = "### User: ";
pub const ASSISTANT_TAG: &str = "### LLM Chatbot: ";

pub const SYSTEM_PREAMBLE: &str = "### System:\n\
You are 'LLM Chatbot', an AI that follows instructions extremely well.\n\
Help as much as you can.\n\
Use less emotes or emojis, but you can employ other methods to appear 'friendly'.\n\
Do not include the previous messages in your reply.\n\
Do not include the '###' tags.\n\
Remember, be safe, and don't do anything illegal.\n\n";

fn role_tag(role: Role) -> &'static str {
    match role {
        Role::User => USER_TAG,
        Role::Assistant => ASSISTANT_TAG,
    }
}

/// Returns the trailing `window` messages of `history`, or all of them when
/// there are fewer.
pub fn recent_window(history: &[Message], window: usize) -> &[Message] {
    let start = history.len().saturating_sub(window);
    &history[start..]
}

/// Render the last `window` messages of `history` into a backend prompt.
pub fn assemble(history: &[Message], window: usize) -> String {
    let selected = recent_window(history, window);
    let body_len: usize = selected
        .iter()
        .map(|msg| role_tag(msg.role).len() + msg.content.len() + 2)
        .sum();

    let mut prompt = String::with_capacity(SYSTEM_PREAMBLE.len() + body_len + ASSISTANT_TAG.len());
    prompt.push_str(SYSTEM_PREAMBLE);
    for msg in selected {
        prompt.push_str(role_tag(msg.role));
        prompt.push_str(&msg.content);
        prompt.push_str("\n\n");
    }
    prompt.push_str(ASSISTANT_TAG);
    prompt
}
