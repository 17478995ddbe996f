//! Relay configuration.
//!
//! TOML-based, with serde defaults on every section so a partial file (or
//! no file at all) yields a working relay.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{LifecycleConfig, LoggingConfig, PendingNoticePolicy, ServerConfig, SignalConfig};
pub use toml_loader::{default_config_path, load_default, load_from_path, ConfigSource};

use std::path::Path;
use voice_signal_common::ConfigError;

/// Load from `path` when given, otherwise from the platform default location.
///
/// An explicit path must exist. Nothing is logged here; callers report the
/// returned source once logging is up.
pub fn load_config(path: Option<&Path>) -> Result<(SignalConfig, ConfigSource), ConfigError> {
    match path {
        Some(path) => Ok((load_from_path(path)?, ConfigSource::File(path.to_path_buf()))),
        None => load_default(),
    }
}
