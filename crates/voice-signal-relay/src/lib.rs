//! voice-signal-relay: room-scoped signaling relay for peer-to-peer voice
//! calls.
//!
//! Clients exchange WebRTC offers, answers and ICE candidates, plus key
//! handshake messages, through topics derived from their room address. The
//! relay never inspects payloads. Connection lifecycle is broadcast on
//! `/topic/user/connected` and `/topic/user/disconnected`.

pub mod connection;
pub mod lifecycle;
pub mod protocol;
pub mod registry;
pub mod relay;
pub mod router;
pub mod routes;
pub mod server;

pub use lifecycle::LifecycleNotifier;
pub use protocol::{ClientFrame, LifecycleNotice, NoticeKind, ServerFrame};
pub use registry::{Session, SessionRegistry, SessionState};
pub use relay::SignalingRelay;
pub use router::{Publisher, TopicRouter};
pub use routes::{
    ResolvedRoute, RoomAddress, Route, RouteParams, RouteTable, RouteTemplate, SignalKind,
};
pub use server::{serve, RelayContext};
