//! Per-connection handler: open the session, then pump frames both ways
//! until the socket closes.

use std::net::SocketAddr;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use voice_signal_common::{RelayError, SessionId};

use crate::protocol::{ClientFrame, ServerFrame};
use crate::router::Outbound;
use crate::server::RelayContext;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Handle a single WebSocket connection.
pub async fn handle_connection(
    ws: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    ctx: RelayContext,
) {
    let (mut sink, mut stream) = ws.split();
    let session_id = SessionId::new();
    let (tx, mut rx) = mpsc::channel::<ServerFrame>(ctx.outbound_buffer);

    // 1. Register and schedule the connected notice.
    if let Err(e) = ctx.notifier.on_open(session_id.clone()).await {
        tracing::warn!(peer = %addr, error = %e, "Rejected connection");
        return;
    }
    tracing::info!(peer = %addr, session = %session_id, "Client connected");

    // 2. Tell the client its session id.
    let hello = ServerFrame::Connected {
        session_id: session_id.clone(),
    };
    if send_frame(&mut sink, &hello).await.is_ok() {
        // 3. Forwarding loop.
        loop {
            tokio::select! {
                // Topic deliveries → this client's WebSocket
                Some(frame) = rx.recv() => {
                    if send_frame(&mut sink, &frame).await.is_err() {
                        break;
                    }
                }

                // This client's WebSocket → relay
                frame = stream.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(reply) =
                                handle_client_text(&ctx, &session_id, &tx, text.as_str()).await
                            {
                                if send_frame(&mut sink, &reply).await.is_err() {
                                    break;
                                }
                            }
                        }
                        Some(Ok(Message::Binary(_))) => {
                            let reply = ServerFrame::error("binary frames are not supported");
                            if send_frame(&mut sink, &reply).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let _ = sink.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(e)) => {
                            tracing::debug!(peer = %addr, error = %e, "WS error");
                            break;
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    // 4. Cleanup.
    tracing::info!(peer = %addr, session = %session_id, "Client disconnected");
    let dropped = ctx.router.unsubscribe_all(&session_id).await;
    tracing::debug!(session = %session_id, subscriptions = dropped, "Subscriptions dropped");

    if let Err(e) = ctx.notifier.on_close(session_id.clone()).await {
        tracing::warn!(session = %session_id, error = %e, "Disconnected notice lost");
    }
}

/// Apply one client text frame. Returns a frame to send back, if any.
pub(crate) async fn handle_client_text(
    ctx: &RelayContext,
    session_id: &SessionId,
    tx: &Outbound,
    text: &str,
) -> Option<ServerFrame> {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(session = %session_id, error = %e, "Invalid client frame");
            return Some(ServerFrame::error(format!("invalid frame: {e}")));
        }
    };

    match frame {
        ClientFrame::Subscribe { destination } => {
            ctx.router.subscribe(&destination, session_id, tx.clone()).await;
            tracing::debug!(session = %session_id, topic = %destination, "Subscribed");
            None
        }
        ClientFrame::Unsubscribe { destination } => {
            ctx.router.unsubscribe(&destination, session_id).await;
            tracing::debug!(session = %session_id, topic = %destination, "Unsubscribed");
            None
        }
        ClientFrame::Send { destination, body } => {
            match ctx.relay.dispatch(&destination, body).await {
                Ok(delivered) => {
                    tracing::debug!(
                        session = %session_id,
                        destination = %destination,
                        delivered,
                        "Relayed"
                    );
                    None
                }
                Err(e @ RelayError::UnknownDestination(_)) => Some(ServerFrame::error(e.to_string())),
                Err(e) => {
                    tracing::warn!(session = %session_id, error = %e, "Relay failed");
                    Some(ServerFrame::error(e.to_string()))
                }
            }
        }
    }
}

/// Send a ServerFrame as a JSON text frame.
async fn send_frame(
    sink: &mut WsSink,
    frame: &ServerFrame,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let json = serde_json::to_string(frame)
        .map_err(|e| tokio_tungstenite::tungstenite::Error::Io(std::io::Error::other(e)))?;
    sink.send(Message::Text(json.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_signal_config::SignalConfig;

    fn ctx() -> RelayContext {
        RelayContext::from_config(&SignalConfig::default())
    }

    fn body(frame: ServerFrame) -> String {
        match frame {
            ServerFrame::Message { body, .. } => body,
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[tokio::test]
    async fn subscribe_then_send_round_trips_through_relay() {
        let ctx = ctx();
        let alice = SessionId::from("alice");
        let bob = SessionId::from("bob");
        let (alice_tx, mut alice_rx) = mpsc::channel(8);
        let (bob_tx, _bob_rx) = mpsc::channel(8);

        let sub = r#"{"type":"subscribe","destination":"/topic/peer/offer/v1/r1"}"#;
        assert!(handle_client_text(&ctx, &alice, &alice_tx, sub).await.is_none());

        let send = r#"{"type":"send","destination":"/peer/offer/v1/r1","body":"sdp-blob-1"}"#;
        assert!(handle_client_text(&ctx, &bob, &bob_tx, send).await.is_none());

        assert_eq!(body(alice_rx.recv().await.unwrap()), "sdp-blob-1");
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let ctx = ctx();
        let sid = SessionId::from("s");
        let (tx, mut rx) = mpsc::channel(8);

        let sub = r#"{"type":"subscribe","destination":"/topic/call/key"}"#;
        let unsub = r#"{"type":"unsubscribe","destination":"/topic/call/key"}"#;
        handle_client_text(&ctx, &sid, &tx, sub).await;
        handle_client_text(&ctx, &sid, &tx, unsub).await;

        let send = r#"{"type":"send","destination":"/call/key","body":"k"}"#;
        handle_client_text(&ctx, &sid, &tx, send).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn garbage_frame_gets_error_reply() {
        let ctx = ctx();
        let (tx, _rx) = mpsc::channel(8);
        let reply = handle_client_text(&ctx, &"s".into(), &tx, "not json").await;
        assert!(matches!(reply, Some(ServerFrame::Error { ref message }) if message.starts_with("invalid frame")));
    }

    #[tokio::test]
    async fn unknown_destination_gets_error_reply() {
        let ctx = ctx();
        let (tx, _rx) = mpsc::channel(8);
        let send = r#"{"type":"send","destination":"/topic/user/connected","body":"spoof"}"#;
        let reply = handle_client_text(&ctx, &"s".into(), &tx, send).await;
        assert!(matches!(
            reply,
            Some(ServerFrame::Error { ref message }) if message.contains("/topic/user/connected")
        ));
    }

    #[tokio::test]
    async fn send_after_shutdown_reports_delivery_error() {
        let ctx = ctx();
        ctx.router.close().await;
        let (tx, _rx) = mpsc::channel(8);
        let send = r#"{"type":"send","destination":"/send/key","body":"k"}"#;
        let reply = handle_client_text(&ctx, &"s".into(), &tx, send).await;
        assert!(matches!(
            reply,
            Some(ServerFrame::Error { ref message }) if message.contains("delivery failed")
        ));
    }
}
