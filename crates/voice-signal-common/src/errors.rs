use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the relay core. None of them is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("delivery failed on {topic}: {reason}")]
    Delivery { topic: String, reason: String },

    #[error("no route for destination: {0}")]
    UnknownDestination(String),

    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
