//! Wire protocol of the bundled WebSocket transport, plus the lifecycle
//! notice body. Signal payloads are carried as opaque `body` strings.

use serde::{Deserialize, Serialize};
use voice_signal_common::SessionId;

use crate::routes::{USER_CONNECTED_TOPIC, USER_DISCONNECTED_TOPIC};

/// Frames a client sends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Subscribe { destination: String },
    Unsubscribe { destination: String },
    Send { destination: String, body: String },
}

/// Frames the relay sends back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// First frame on every connection.
    Connected { session_id: SessionId },
    /// A publish on a topic this connection subscribes to.
    Message { destination: String, body: String },
    Error { message: String },
}

impl ServerFrame {
    pub fn error(message: impl Into<String>) -> Self {
        ServerFrame::Error {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Connected,
    Disconnected,
}

impl NoticeKind {
    pub fn topic(self) -> &'static str {
        match self {
            NoticeKind::Connected => USER_CONNECTED_TOPIC,
            NoticeKind::Disconnected => USER_DISCONNECTED_TOPIC,
        }
    }
}

/// `{"type": "connected" | "disconnected", "sessionId": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LifecycleNotice {
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
}

impl LifecycleNotice {
    pub fn new(kind: NoticeKind, session_id: SessionId) -> Self {
        Self { kind, session_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_notice_json() {
        let notice = LifecycleNotice::new(NoticeKind::Connected, "abc123".into());
        assert_eq!(
            serde_json::to_string(&notice).unwrap(),
            r#"{"type":"connected","sessionId":"abc123"}"#
        );
    }

    #[test]
    fn disconnected_notice_json() {
        let notice = LifecycleNotice::new(NoticeKind::Disconnected, "abc123".into());
        assert_eq!(
            serde_json::to_string(&notice).unwrap(),
            r#"{"type":"disconnected","sessionId":"abc123"}"#
        );
    }

    #[test]
    fn notice_topics() {
        assert_eq!(NoticeKind::Connected.topic(), "/topic/user/connected");
        assert_eq!(NoticeKind::Disconnected.topic(), "/topic/user/disconnected");
    }

    #[test]
    fn parse_client_frames() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"subscribe","destination":"/topic/call/key"}"#)
                .unwrap();
        assert_eq!(
            frame,
            ClientFrame::Subscribe {
                destination: "/topic/call/key".into()
            }
        );

        let frame: ClientFrame = serde_json::from_str(
            r#"{"type":"send","destination":"/peer/offer/v1/r1","body":"sdp-blob-1"}"#,
        )
        .unwrap();
        assert!(matches!(frame, ClientFrame::Send { ref body, .. } if body == "sdp-blob-1"));
    }

    #[test]
    fn send_without_body_is_rejected() {
        let result =
            serde_json::from_str::<ClientFrame>(r#"{"type":"send","destination":"/call/key"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn server_frames_are_tagged() {
        let json = serde_json::to_string(&ServerFrame::Message {
            destination: "/topic/send/key".into(),
            body: "k".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"message","destination":"/topic/send/key","body":"k"}"#
        );

        let json = serde_json::to_string(&ServerFrame::Connected {
            session_id: "s1".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"connected","session_id":"s1"}"#);
    }
}
