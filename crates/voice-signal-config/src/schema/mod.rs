//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod lifecycle;
mod logging;
mod server;

pub use lifecycle::*;
pub use logging::*;
pub use server::*;

use serde::{Deserialize, Serialize};

/// Root configuration for the signaling relay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub server: ServerConfig,
    pub lifecycle: LifecycleConfig,
    pub logging: LoggingConfig,
}
