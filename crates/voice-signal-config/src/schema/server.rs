use serde::{Deserialize, Serialize};

/// Listener and per-connection transport limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest inbound WebSocket message accepted, in bytes.
    pub max_message_bytes: usize,
    /// Capacity of each connection's outbound queue.
    pub outbound_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            max_message_bytes: 64 * 1024,
            outbound_buffer: 256,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
