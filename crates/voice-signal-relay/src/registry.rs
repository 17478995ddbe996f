//! Session registry: the set of connections the transport considers open.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, warn};
use voice_signal_common::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Disconnected,
}

/// One live connection. Disconnected sessions are handed back to the caller
/// and never kept in the registry.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub state: SessionState,
    pub connected_at: Instant,
    pending_notices: Vec<AbortHandle>,
}

impl Session {
    /// Handles of the scheduled "connected" notices, one per connect event
    /// seen for this id.
    pub fn take_pending_notices(&mut self) -> Vec<AbortHandle> {
        std::mem::take(&mut self.pending_notices)
    }
}

/// Thread-safe session map.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connected session together with its pending notice, under
    /// one write lock. Returns false if the id was already registered; the
    /// entry is overwritten but earlier pending notices stay attached.
    pub async fn on_connect(&self, id: SessionId, pending_notice: Option<AbortHandle>) -> bool {
        let mut map = self.sessions.write().await;
        let mut pending_notices = Vec::new();
        let fresh = match map.remove(&id) {
            Some(mut previous) => {
                warn!(session = %id, "Session registered twice, overwriting");
                pending_notices.append(&mut previous.pending_notices);
                false
            }
            None => true,
        };
        pending_notices.extend(pending_notice);
        map.insert(
            id.clone(),
            Session {
                id,
                state: SessionState::Connected,
                connected_at: Instant::now(),
                pending_notices,
            },
        );
        fresh
    }

    /// Remove a session. Unknown ids are a no-op.
    pub async fn on_disconnect(&self, id: &SessionId) -> Option<Session> {
        let mut map = self.sessions.write().await;
        match map.remove(id) {
            Some(mut session) => {
                session.state = SessionState::Disconnected;
                Some(session)
            }
            None => {
                debug!(session = %id, "Disconnect for unknown session");
                None
            }
        }
    }

    pub async fn is_connected(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().cloned().collect()
    }
}
