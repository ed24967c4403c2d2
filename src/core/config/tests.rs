use super::data::{Config, ConfigKeyError, MissingServerUrl, LEGACY_SERVER_URL_ENV, SERVER_URL_ENV};
use super::io::ConfigError;
use crate::core::prompt::DEFAULT_WINDOW;
use crate::core::reveal::{Pacing, DEFAULT_REVEAL_DELAY};
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.history_window(), DEFAULT_WINDOW);
    assert_eq!(config.pacing(), Pacing::Animated(DEFAULT_REVEAL_DELAY));
    assert_eq!(config.connect_timeout(), None);
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set_key("server-url", "https://abc.ngrok.io").unwrap();
    config.set_key("history-window", "8").unwrap();
    config.set_key("reveal-delay-ms", "0").unwrap();
    config.save_to_path(&config_path).expect("save failed");

    let loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded.server_url.as_deref(), Some("https://abc.ngrok.io"));
    assert_eq!(loaded.history_window(), 8);
    assert_eq!(loaded.pacing(), Pacing::Instant);

    let mut loaded = loaded;
    loaded.unset_key("history-window").unwrap();
    loaded.save_to_path(&config_path).expect("second save failed");

    let reloaded = Config::load_from_path(&config_path).expect("reload failed");
    assert_eq!(reloaded.history_window, None);
    assert_eq!(reloaded.server_url.as_deref(), Some("https://abc.ngrok.io"));
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "history_window = \"many\"").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn set_key_rejects_unknown_keys_and_bad_numbers() {
    let mut config = Config::default();
    assert_eq!(
        config.set_key("theme", "dark"),
        Err(ConfigKeyError::UnknownKey("theme".to_string()))
    );
    assert_eq!(
        config.set_key("history-window", "lots"),
        Err(ConfigKeyError::InvalidValue {
            key: "history-window".to_string(),
            value: "lots".to_string()
        })
    );
    assert_eq!(
        config.set_key("history-window", "0"),
        Err(ConfigKeyError::InvalidValue {
            key: "history-window".to_string(),
            value: "0".to_string()
        })
    );
    assert_eq!(config.history_window, None);
    assert!(config.set_key("default-model", "  ").is_err());
    assert!(config.unset_key("nope").is_err());

    config.set_key("connect-timeout-secs", "3").unwrap();
    assert_eq!(config.connect_timeout(), Some(Duration::from_secs(3)));
}

#[test]
fn zero_history_window_from_file_falls_back_to_default() {
    let config = Config {
        history_window: Some(0),
        ..Default::default()
    };
    assert_eq!(config.history_window(), DEFAULT_WINDOW);
}

#[test]
fn server_url_precedence_is_flag_env_legacy_env_file() {
    let config = Config {
        server_url: Some("http://from-file".to_string()),
        ..Default::default()
    };
    let all_env = env_from(&[
        (SERVER_URL_ENV, "http://from-env"),
        (LEGACY_SERVER_URL_ENV, "http://from-legacy"),
    ]);

    assert_eq!(
        config.resolve_server_url(Some("http://from-flag"), &all_env),
        Ok("http://from-flag".to_string())
    );
    assert_eq!(
        config.resolve_server_url(None, &all_env),
        Ok("http://from-env".to_string())
    );
    assert_eq!(
        config.resolve_server_url(None, env_from(&[(LEGACY_SERVER_URL_ENV, "http://from-legacy")])),
        Ok("http://from-legacy".to_string())
    );
    assert_eq!(
        config.resolve_server_url(Some("  "), env_from(&[])),
        Ok("http://from-file".to_string())
    );
}

#[test]
fn missing_server_url_is_an_error() {
    let config = Config::default();
    let err = config
        .resolve_server_url(None, env_from(&[(SERVER_URL_ENV, "")]))
        .unwrap_err();
    assert_eq!(err, MissingServerUrl);
    assert!(err.to_string().contains("--server-url"));
}
