use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::prompt::DEFAULT_WINDOW;
use crate::core::reveal::{Pacing, DEFAULT_REVEAL_DELAY};

/// Environment variable naming the server base URL.
pub const SERVER_URL_ENV: &str = "LLM_SAMPLER_URL";
/// Older deployments exported the tunnel address under this name.
pub const LEGACY_SERVER_URL_ENV: &str = "ngrok_url";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the sampling server
    pub server_url: Option<String>,
    /// Number of most recent messages sent with each prompt
    pub history_window: Option<usize>,
    /// Delay between revealed words; 0 disables the animation
    pub reveal_delay_ms: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    /// Model to load on startup when the server has none loaded
    pub default_model: Option<String>,
}

/// Keys accepted by `set` and `unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "server-url",
    "history-window",
    "reveal-delay-ms",
    "connect-timeout-secs",
    "default-model",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigKeyError {
    UnknownKey(String),
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKeyError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (expected one of: {})",
                CONFIG_KEYS.join(", ")
            ),
            ConfigKeyError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {key}: {value}")
            }
        }
    }
}

impl StdError for ConfigKeyError {}

/// No base URL was supplied anywhere; the client cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingServerUrl;

impl fmt::Display for MissingServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No server URL configured. Pass --server-url, export {SERVER_URL_ENV}, \
             or run 'llm-sampler set server-url <url>'."
        )
    }
}

impl StdError for MissingServerUrl {}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigKeyError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigKeyError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn history_window(&self) -> usize {
        // A zero window would drop the message being submitted.
        self.history_window
            .filter(|window| *window > 0)
            .unwrap_or(DEFAULT_WINDOW)
    }

    pub fn pacing(&self) -> Pacing {
        match self.reveal_delay_ms {
            Some(delay_ms) => Pacing::from_delay_ms(delay_ms),
            None => Pacing::Animated(DEFAULT_REVEAL_DELAY),
        }
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    /// Pick the server URL: explicit flag, then environment, then this file.
    pub fn resolve_server_url<F>(
        &self,
        flag: Option<&str>,
        env: F,
    ) -> Result<String, MissingServerUrl>
    where
        F: Fn(&str) -> Option<String>,
    {
        non_blank(flag.map(str::to_string))
            .or_else(|| non_blank(env(SERVER_URL_ENV)))
            .or_else(|| non_blank(env(LEGACY_SERVER_URL_ENV)))
            .or_else(|| non_blank(self.server_url.clone()))
            .ok_or(MissingServerUrl)
    }

    pub fn set_key(&mut self, key: &str, value: &str) -> Result<(), ConfigKeyError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigKeyError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        match key {
            "server-url" => self.server_url = Some(value.to_string()),
            "history-window" => {
                let window: NonZeroUsize = parse_number(key, value)?;
                self.history_window = Some(window.get());
            }
            "reveal-delay-ms" => self.reveal_delay_ms = Some(parse_number(key, value)?),
            "connect-timeout-secs" => {
                self.connect_timeout_secs = Some(parse_number(key, value)?)
            }
            "default-model" => self.default_model = Some(value.to_string()),
            _ => return Err(ConfigKeyError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn unset_key(&mut self, key: &str) -> Result<(), ConfigKeyError> {
        match key {
            "server-url" => self.server_url = None,
            "history-window" => self.history_window = None,
            "reveal-delay-ms" => self.reveal_delay_ms = None,
            "connect-timeout-secs" => self.connect_timeout_secs = None,
            "default-model" => self.default_model = None,
            _ => return Err(ConfigKeyError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn print_all(&self) {
        fn show<T: fmt::Display>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "(unset)".to_string())
        }

        println!("Current configuration:");
        println!("  server-url: {}", show(&self.server_url));
        println!(
            "  history-window: {}",
            self.history_window
                .map(|w| w.to_string())
                .unwrap_or_else(|| format!("(default {DEFAULT_WINDOW})"))
        );
        println!(
            "  reveal-delay-ms: {}",
            self.reveal_delay_ms
                .map(|d| d.to_string())
                .unwrap_or_else(|| format!("(default {})", DEFAULT_REVEAL_DELAY.as_millis()))
        );
        println!("  connect-timeout-secs: {}", show(&self.connect_timeout_secs));
        println!("  default-model: {}", show(&self.default_model));
    }
}

/// Get a user-friendly display string for a path, using `~` for the home
/// directory on Unix-like systems.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
