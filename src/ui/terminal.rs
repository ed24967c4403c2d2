//! Line-oriented terminal presenter.
//!
//! Prints user turns as they are accepted, redraws assistant replies in place
//! as the reveal advances, and colors notices by severity when attached to a
//! terminal.

use std::io::{self, Write};

use ratatui::crossterm::{
    cursor::MoveLeft,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tracing::debug;

use crate::core::controller::TurnState;
use crate::core::reveal::{RevealFrame, CURSOR_GLYPH};
use crate::core::session::SessionState;
use crate::ui::{short_model_name, NoticeKind, Presenter, GENERATING_PLACEHOLDER};

pub const USER_LABEL: &str = "You";
pub const ASSISTANT_LABEL: &str = "LLM Chatbot";

pub struct TerminalPresenter<W: Write> {
    out: W,
    color: bool,
    /// Messages already written to the transcript.
    printed: usize,
    /// Part of the current reply already on screen, excluding the cursor.
    revealed: String,
    cursor_shown: bool,
    loaded_model: Option<String>,
}

impl TerminalPresenter<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            printed: 0,
            revealed: String::new(),
            cursor_shown: false,
            loaded_model: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn notice_color(kind: NoticeKind) -> Option<Color> {
        match kind {
            NoticeKind::Success => Some(Color::Green),
            NoticeKind::Info => None,
            NoticeKind::Warning => Some(Color::Yellow),
            NoticeKind::Error => Some(Color::Red),
        }
    }

    fn write_line(&mut self, color: Option<Color>, dim: bool, text: &str) -> io::Result<()> {
        if self.color {
            if let Some(color) = color {
                queue!(self.out, SetForegroundColor(color))?;
            }
            if dim {
                queue!(self.out, SetAttribute(Attribute::Dim))?;
            }
            queue!(
                self.out,
                Print(text),
                SetAttribute(Attribute::Reset),
                ResetColor,
                Print("\n")
            )?;
        } else {
            writeln!(self.out, "{text}")?;
        }
        self.out.flush()
    }

    fn write_label(&mut self, label: &str, color: Color) -> io::Result<()> {
        if self.color {
            queue!(
                self.out,
                SetForegroundColor(color),
                SetAttribute(Attribute::Bold),
                Print(format!("{label}: ")),
                SetAttribute(Attribute::Reset),
                ResetColor
            )
        } else {
            write!(self.out, "{label}: ")
        }
    }

    fn try_render(&mut self, state: TurnState, session: &SessionState) -> io::Result<()> {
        let messages = session.messages();
        if messages.len() < self.printed {
            self.printed = 0;
            self.write_line(Some(Color::DarkGrey), true, "──────── new conversation ────────")?;
        }

        for message in &messages[self.printed..] {
            // Replies reach the screen through `reveal`.
            if message.is_user() {
                self.write_label(USER_LABEL, Color::Cyan)?;
                self.write_line(None, false, &message.content)?;
            }
        }
        self.printed = messages.len();

        let loaded = session.loaded_model().map(str::to_string);
        if loaded != self.loaded_model {
            let line = match &loaded {
                Some(model) => format!("Model loaded: {}", short_model_name(model)),
                None => "Model loaded: none".to_string(),
            };
            self.loaded_model = loaded;
            self.write_line(Some(Color::DarkGrey), true, &line)?;
        }

        if state == TurnState::Submitting {
            self.write_line(Some(Color::DarkGrey), true, GENERATING_PLACEHOLDER)?;
        }
        Ok(())
    }

    fn try_reveal(&mut self, frame: &RevealFrame) -> io::Result<()> {
        if self.revealed.is_empty() && !self.cursor_shown {
            self.write_label(ASSISTANT_LABEL, Color::Magenta)?;
        }

        if self.cursor_shown {
            if self.color {
                queue!(self.out, MoveLeft(1), Clear(ClearType::UntilNewLine))?;
            } else {
                // Backspace over the glyph when escape sequences are off.
                write!(self.out, "\u{8} \u{8}")?;
            }
            self.cursor_shown = false;
        }

        let fresh = frame
            .text
            .strip_prefix(self.revealed.as_str())
            .unwrap_or(frame.text.as_str());
        write!(self.out, "{fresh}")?;

        if frame.is_final {
            writeln!(self.out)?;
            self.revealed.clear();
        } else {
            write!(self.out, "{CURSOR_GLYPH}")?;
            self.revealed = frame.text.clone();
            self.cursor_shown = true;
        }
        self.out.flush()
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn notice(&mut self, kind: NoticeKind, text: &str) {
        let line = format!("• {text}");
        if let Err(err) = self.write_line(Self::notice_color(kind), false, &line) {
            debug!(error = %err, "failed to write notice");
        }
    }

    fn render(&mut self, state: TurnState, session: &SessionState) {
        if let Err(err) = self.try_render(state, session) {
            debug!(error = %err, "failed to render transcript");
        }
    }

    fn reveal(&mut self, frame: &RevealFrame) {
        if let Err(err) = self.try_reveal(frame) {
            debug!(error = %err, "failed to draw reply");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;
    use crate::core::reveal::reveal_frames;

    fn output(presenter: TerminalPresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).expect("output should be utf-8")
    }

    #[test]
    fn plain_transcript_shows_user_turn_placeholder_and_model() {
        let mut presenter = TerminalPresenter::new(Vec::new(), false);
        let mut session = SessionState::new();
        session.set_loaded_model(Some("gguf_mistral_7b".to_string()));
        session.append_message(Role::User, "hi").unwrap();
        session.set_lock(true);

        presenter.render(TurnState::Submitting, &session);

        assert_eq!(
            output(presenter),
            format!("You: hi\nModel loaded: mistral\n{GENERATING_PLACEHOLDER}\n")
        );
    }

    #[test]
    fn reveal_erases_cursor_before_each_word() {
        let mut presenter = TerminalPresenter::new(Vec::new(), false);
        for frame in reveal_frames("Hello big world") {
            presenter.reveal(&frame);
        }

        assert_eq!(
            output(presenter),
            "LLM Chatbot: Hello ▌\u{8} \u{8}big ▌\u{8} \u{8}world \n"
        );
    }

    #[test]
    fn reset_prints_separator_and_restarts_transcript() {
        let mut presenter = TerminalPresenter::new(Vec::new(), false);
        let mut session = SessionState::new();
        session.append_message(Role::User, "one").unwrap();
        session.append_message(Role::Assistant, "reply").unwrap();
        presenter.render(TurnState::AwaitingUserInput, &session);

        session.reset();
        presenter.render(TurnState::AwaitingUserInput, &session);
        session.append_message(Role::User, "two").unwrap();
        presenter.render(TurnState::AwaitingUserInput, &session);

        let text = output(presenter);
        assert_eq!(text.matches("You: ").count(), 2);
        assert!(!text.contains("reply"));
        let separator = text.find("new conversation").expect("separator printed");
        assert!(separator < text.find("You: two").unwrap());
    }

    #[test]
    fn notices_are_bulleted() {
        let mut presenter = TerminalPresenter::new(Vec::new(), false);
        presenter.notice(NoticeKind::Warning, "Please load a model first.");
        assert_eq!(output(presenter), "• Please load a model first.\n");
    }
}
