use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What happens to a scheduled "connected" notice when its session
/// disconnects before the notice fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PendingNoticePolicy {
    /// The notice fires anyway; every connection is announced.
    #[default]
    Announce,
    /// The notice is dropped when the session leaves first.
    CancelOnDisconnect,
}

/// Connect/disconnect notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Delay between a connection opening and its "connected" broadcast.
    pub connect_notice_delay_ms: u64,
    pub pending_notice: PendingNoticePolicy,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            connect_notice_delay_ms: 1000,
            pending_notice: PendingNoticePolicy::Announce,
        }
    }
}

impl LifecycleConfig {
    pub fn connect_notice_delay(&self) -> Duration {
        Duration::from_millis(self.connect_notice_delay_ms)
    }
}
