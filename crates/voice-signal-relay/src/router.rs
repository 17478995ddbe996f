//! Topic router: the pub/sub seam between the relay core and connections.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use voice_signal_common::{RelayError, SessionId};

use crate::protocol::ServerFrame;

/// Outbound queue of one connection.
pub type Outbound = mpsc::Sender<ServerFrame>;

/// Anything that can deliver a body to every current subscriber of a topic.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Returns how many subscribers the message was handed to.
    async fn publish(&self, topic: &str, body: String) -> Result<usize, RelayError>;
}

#[derive(Default)]
struct RouterState {
    topics: HashMap<String, HashMap<SessionId, Outbound>>,
    closed: bool,
}

/// Thread-safe topic → subscriber map.
#[derive(Clone, Default)]
pub struct TopicRouter {
    state: Arc<RwLock<RouterState>>,
}

impl TopicRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `session` to `topic`. Returns false if it already was.
    pub async fn subscribe(&self, topic: &str, session: &SessionId, tx: Outbound) -> bool {
        let mut state = self.state.write().await;
        state
            .topics
            .entry(topic.to_string())
            .or_default()
            .insert(session.clone(), tx)
            .is_none()
    }

    pub async fn unsubscribe(&self, topic: &str, session: &SessionId) -> bool {
        let mut state = self.state.write().await;
        let Some(subs) = state.topics.get_mut(topic) else {
            return false;
        };
        let removed = subs.remove(session).is_some();
        if subs.is_empty() {
            state.topics.remove(topic);
        }
        removed
    }

    /// Drop every subscription held by `session`. Returns how many were removed.
    pub async fn unsubscribe_all(&self, session: &SessionId) -> usize {
        let mut state = self.state.write().await;
        let mut removed = 0;
        state.topics.retain(|_, subs| {
            if subs.remove(session).is_some() {
                removed += 1;
            }
            !subs.is_empty()
        });
        removed
    }

    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.state
            .read()
            .await
            .topics
            .get(topic)
            .map_or(0, HashMap::len)
    }

    pub async fn topic_count(&self) -> usize {
        self.state.read().await.topics.len()
    }

    /// Stop delivering. Every later publish fails with a delivery error.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        state.closed = true;
        state.topics.clear();
    }
}

#[async_trait]
impl Publisher for TopicRouter {
    async fn publish(&self, topic: &str, body: String) -> Result<usize, RelayError> {
        let state = self.state.read().await;
        if state.closed {
            return Err(RelayError::Delivery {
                topic: topic.to_string(),
                reason: "router closed".into(),
            });
        }

        let Some(subs) = state.topics.get(topic) else {
            return Ok(0);
        };

        let mut delivered = 0;
        for (session, tx) in subs {
            let frame = ServerFrame::Message {
                destination: topic.to_string(),
                body: body.clone(),
            };
            match tx.try_send(frame) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(session = %session, topic = %topic, "Outbound queue full, dropping message");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(session = %session, topic = %topic, "Subscriber gone");
                }
            }
        }
        Ok(delivered)
    }
}
