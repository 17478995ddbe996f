//! Signaling relay: republishes negotiation and key messages, unmodified,
//! to the topic their room and kind map to.

use std::sync::Arc;

use tracing::debug;
use voice_signal_common::RelayError;

use crate::router::Publisher;
use crate::routes::{RoomAddress, Route, RouteTable, SignalKind};

pub struct SignalingRelay {
    publisher: Arc<dyn Publisher>,
    routes: RouteTable,
}

impl SignalingRelay {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self {
            publisher,
            routes: RouteTable::standard(),
        }
    }

    /// Publish `payload` to every current subscriber of `kind` in `room`.
    pub async fn relay(
        &self,
        kind: SignalKind,
        room: &RoomAddress,
        payload: String,
    ) -> Result<usize, RelayError> {
        self.publish_route(Route::Signal(kind), Some(room), payload)
            .await
    }

    pub async fn offer(&self, room: &RoomAddress, payload: String) -> Result<usize, RelayError> {
        self.relay(SignalKind::Offer, room, payload).await
    }

    pub async fn answer(&self, room: &RoomAddress, payload: String) -> Result<usize, RelayError> {
        self.relay(SignalKind::Answer, room, payload).await
    }

    pub async fn ice_candidate(
        &self,
        room: &RoomAddress,
        payload: String,
    ) -> Result<usize, RelayError> {
        self.relay(SignalKind::IceCandidate, room, payload).await
    }

    /// Ask peers for their keys. Not room-scoped.
    pub async fn call_key(&self, payload: String) -> Result<usize, RelayError> {
        self.publish_route(Route::CallKey, None, payload).await
    }

    /// Announce this client's key to every listener. Not room-scoped.
    pub async fn send_key(&self, payload: String) -> Result<usize, RelayError> {
        self.publish_route(Route::SendKey, None, payload).await
    }

    /// Route an inbound `destination` through the table and publish to the
    /// topic it resolves to.
    pub async fn dispatch(&self, destination: &str, payload: String) -> Result<usize, RelayError> {
        let resolved = self
            .routes
            .resolve(destination)
            .ok_or_else(|| RelayError::UnknownDestination(destination.to_string()))?;

        self.publish(resolved.route, &resolved.topic, payload).await
    }

    async fn publish_route(
        &self,
        route: Route,
        room: Option<&RoomAddress>,
        payload: String,
    ) -> Result<usize, RelayError> {
        let topic = self
            .routes
            .outbound_topic(route, room)
            .ok_or_else(|| RelayError::UnknownDestination(format!("{route:?}")))?;
        self.publish(route, &topic, payload).await
    }

    async fn publish(&self, route: Route, topic: &str, payload: String) -> Result<usize, RelayError> {
        debug!(route = ?route, topic = %topic, payload = %payload, "Relaying");
        self.publisher.publish(topic, payload).await
    }
}
