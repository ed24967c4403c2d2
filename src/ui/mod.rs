//! Presentation seam between the chat controller and whatever draws it.

pub mod chat_loop;
pub mod picker;
pub mod terminal;

use crate::core::controller::TurnState;
use crate::core::reveal::RevealFrame;
use crate::core::session::SessionState;

/// Placeholder shown in place of the prompt while a turn is in flight.
pub const GENERATING_PLACEHOLDER: &str = "Generating response, please wait 😊";

/// Severity of a status notice. Notices are shown to the user but never
/// become part of the conversation sent to the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

/// Receives every change the controller makes, in order.
pub trait Presenter {
    fn notice(&mut self, kind: NoticeKind, text: &str);

    /// Called after each controller transition with the resulting state.
    fn render(&mut self, state: TurnState, session: &SessionState);

    /// One step of the paced reveal of an assistant reply.
    fn reveal(&mut self, frame: &RevealFrame);
}

/// Display form of a backend model identifier.
///
/// Identifiers are `<format>_<name>[_...]`; the second segment is the name
/// users recognise. Identifiers without an underscore are shown as is.
pub fn short_model_name(identifier: &str) -> &str {
    identifier.split('_').nth(1).unwrap_or(identifier)
}
