//! Paced display of a response that has already been received in full.
//!
//! Nothing here touches the network or the session; it only decides which
//! partial strings the presenter is shown and when.

use std::time::Duration;

pub const CURSOR_GLYPH: &str = "▌";
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Wait the given delay before every frame.
    Animated(Duration),
    /// Skip straight to the final frame.
    Instant,
}

impl Pacing {
    pub fn from_delay_ms(delay_ms: u64) -> Self {
        if delay_ms == 0 {
            Pacing::Instant
        } else {
            Pacing::Animated(Duration::from_millis(delay_ms))
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::Animated(DEFAULT_REVEAL_DELAY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealFrame {
    pub text: String,
    pub is_final: bool,
}

impl RevealFrame {
    /// Text as it should be drawn, with the typing cursor on partial frames.
    pub fn rendered(&self) -> String {
        if self.is_final {
            self.text.clone()
        } else {
            format!("{}{}", self.text, CURSOR_GLYPH)
        }
    }
}

/// Split `response` on whitespace and build one frame per token.
///
/// Every token is followed by a single space in the growing buffer. The
/// last frame carries the complete buffer and is marked final; a response
/// with no tokens yields a single empty final frame.
pub fn reveal_frames(response: &str) -> Vec<RevealFrame> {
    let tokens: Vec<&str> = response.split_whitespace().collect();
    if tokens.is_empty() {
        return vec![RevealFrame {
            text: String::new(),
            is_final: true,
        }];
    }

    let mut buffer = String::with_capacity(response.len() + 1);
    let last = tokens.len() - 1;
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            buffer.push_str(token);
            buffer.push(' ');
            RevealFrame {
                text: buffer.clone(),
                is_final: index == last,
            }
        })
        .collect()
}

/// Hand each frame of `response` to `show`, sleeping between frames when
/// `pacing` is animated. Only the final frame is shown for
/// [`Pacing::Instant`].
pub async fn play<F>(response: &str, pacing: Pacing, mut show: F)
where
    F: FnMut(&RevealFrame),
{
    let frames = reveal_frames(response);
    match pacing {
        Pacing::Instant => {
            if let Some(last) = frames.last() {
                show(last);
            }
        }
        Pacing::Animated(delay) => {
            for frame in &frames {
                tokio::time::sleep(delay).await;
                show(frame);
            }
        }
    }
}
