//! Lifecycle notifier: turns connection open/close events into registry
//! updates and broadcast notices.
//!
//! A "connected" notice is published after a fixed delay so the new client
//! has time to subscribe to the broadcast topic first. A "disconnected"
//! notice is published immediately.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use voice_signal_common::{RelayError, SessionId};
use voice_signal_config::{LifecycleConfig, PendingNoticePolicy};

use crate::protocol::{LifecycleNotice, NoticeKind};
use crate::registry::SessionRegistry;
use crate::router::Publisher;

pub struct LifecycleNotifier {
    registry: SessionRegistry,
    publisher: Arc<dyn Publisher>,
    connect_delay: Duration,
    policy: PendingNoticePolicy,
}

impl LifecycleNotifier {
    pub fn new(
        registry: SessionRegistry,
        publisher: Arc<dyn Publisher>,
        config: &LifecycleConfig,
    ) -> Self {
        Self {
            registry,
            publisher,
            connect_delay: config.connect_notice_delay(),
            policy: config.pending_notice,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Connection opened: register now, announce after the configured delay.
    ///
    /// Returns without waiting for the announcement.
    pub async fn on_open(&self, session_id: SessionId) -> Result<(), RelayError> {
        if session_id.is_blank() {
            warn!("Connect event without a session id, dropping");
            return Err(RelayError::MalformedEvent("missing session id".into()));
        }

        info!(session = %session_id, "Session connected");
        let task = self.schedule_connected_notice(session_id.clone());
        self.registry
            .on_connect(session_id, Some(task.abort_handle()))
            .await;
        Ok(())
    }

    /// Connection closed: unregister and announce immediately.
    pub async fn on_close(&self, session_id: SessionId) -> Result<usize, RelayError> {
        if session_id.is_blank() {
            warn!("Disconnect event without a session id, dropping");
            return Err(RelayError::MalformedEvent("missing session id".into()));
        }

        match self.registry.on_disconnect(&session_id).await {
            Some(mut session) => {
                info!(
                    session = %session_id,
                    connected_for_ms = session.connected_at.elapsed().as_millis() as u64,
                    "Session disconnected"
                );
                if self.policy == PendingNoticePolicy::CancelOnDisconnect {
                    for pending in session.take_pending_notices() {
                        pending.abort();
                    }
                    debug!(session = %session_id, "Cancelled pending connected notices");
                }
            }
            None => info!(session = %session_id, "Unregistered session disconnected"),
        }

        publish_notice(self.publisher.as_ref(), NoticeKind::Disconnected, &session_id).await
    }

    fn schedule_connected_notice(&self, session_id: SessionId) -> JoinHandle<()> {
        let publisher = Arc::clone(&self.publisher);
        let deadline = tokio::time::Instant::now() + self.connect_delay;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Err(e) =
                publish_notice(publisher.as_ref(), NoticeKind::Connected, &session_id).await
            {
                warn!(session = %session_id, error = %e, "Connected notice lost");
            }
        })
    }
}

async fn publish_notice(
    publisher: &dyn Publisher,
    kind: NoticeKind,
    session_id: &SessionId,
) -> Result<usize, RelayError> {
    let notice = LifecycleNotice::new(kind, session_id.clone());
    let body = serde_json::to_string(&notice).map_err(|e| RelayError::Protocol(e.to_string()))?;
    publisher.publish(kind.topic(), body).await
}
