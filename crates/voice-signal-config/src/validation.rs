//! Configuration validation.
//!
//! Checks numeric ranges and required strings, collecting every problem
//! into a single error.

use crate::schema::SignalConfig;
use voice_signal_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SignalConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push("server.host must not be empty".into());
    }
    if config.server.port == 0 {
        errors.push("server.port must be non-zero".into());
    }
    validate_range(
        &mut errors,
        "server.max_message_bytes",
        config.server.max_message_bytes as u64,
        1024,
        16 * 1024 * 1024,
    );
    validate_range(
        &mut errors,
        "server.outbound_buffer",
        config.server.outbound_buffer as u64,
        1,
        65536,
    );
    validate_range(
        &mut errors,
        "lifecycle.connect_notice_delay_ms",
        config.lifecycle.connect_notice_delay_ms,
        0,
        60_000,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Push an error if `value` is outside `[min, max]`.
fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&SignalConfig::default()).is_ok());
    }

    #[test]
    fn zero_delay_is_allowed() {
        let mut config = SignalConfig::default();
        config.lifecycle.connect_notice_delay_ms = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn delay_over_a_minute_is_rejected() {
        let mut config = SignalConfig::default();
        config.lifecycle.connect_notice_delay_ms = 120_000;
        let err = validate(&config).unwrap_err();
        assert!(err
            .to_string()
            .contains("lifecycle.connect_notice_delay_ms = 120000"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = SignalConfig::default();
        config.server.port = 0;
        config.server.host = " ".into();
        config.server.outbound_buffer = 0;
        let msg = validate(&config).unwrap_err().to_string();
        assert!(msg.contains("server.port"));
        assert!(msg.contains("server.host"));
        assert!(msg.contains("server.outbound_buffer"));
    }

    #[test]
    fn tiny_message_limit_is_rejected() {
        let mut config = SignalConfig::default();
        config.server.max_message_bytes = 10;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
