//! Core TOML config loading: read from path or platform default.

use crate::schema::SignalConfig;
use crate::validation;
use std::path::Path;
use voice_signal_common::ConfigError;

use super::paths::default_config_path;

/// Where a loaded config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(std::path::PathBuf),
    /// No file at the default location; every field is a default.
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. The result is validated and a
/// config with out-of-range values is rejected.
pub fn load_from_path(path: &Path) -> Result<SignalConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: SignalConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    validation::validate(&config)?;
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/voice-signal/config.toml`
///
/// An absent file is not an error; the defaults are returned.
pub fn load_default() -> Result<(SignalConfig, ConfigSource), ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok((config, ConfigSource::File(path))),
        Err(ConfigError::FileNotFound(_)) => Ok((SignalConfig::default(), ConfigSource::Defaults)),
        Err(e) => Err(e),
    }
}
