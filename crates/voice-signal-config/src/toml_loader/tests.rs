//! Tests for TOML config loading and path resolution.

use super::*;
use crate::schema::PendingNoticePolicy;
use std::path::Path;
use voice_signal_common::ConfigError;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_voice_signal_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[server]
port = 9100

[lifecycle]
connect_notice_delay_ms = 250
pending_notice = "cancel_on_disconnect"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.lifecycle.connect_notice_delay_ms, 250);
    assert_eq!(
        config.lifecycle.pending_notice,
        PendingNoticePolicy::CancelOnDisconnect
    );
    // Defaults preserved
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.logging.filter, "voice_signal_relay=info");
}

#[test]
fn load_empty_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.lifecycle.connect_notice_delay_ms, 1000);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_unknown_policy_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[lifecycle]\npending_notice = \"sometimes\"\n").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_out_of_range_returns_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server]\nport = 0\n").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn default_config_path_ends_with_app_dir() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("voice-signal/config.toml"));
    }
}
