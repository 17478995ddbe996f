//! Listener loop and the shared state every connection handler gets.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_tungstenite::accept_async_with_config;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use voice_signal_config::SignalConfig;

use crate::connection::handle_connection;
use crate::lifecycle::LifecycleNotifier;
use crate::registry::SessionRegistry;
use crate::relay::SignalingRelay;
use crate::router::TopicRouter;

/// Everything a connection handler needs. Cheap to clone.
#[derive(Clone)]
pub struct RelayContext {
    pub router: TopicRouter,
    pub relay: Arc<SignalingRelay>,
    pub notifier: Arc<LifecycleNotifier>,
    pub outbound_buffer: usize,
    pub max_message_bytes: usize,
}

impl RelayContext {
    pub fn from_config(config: &SignalConfig) -> Self {
        let router = TopicRouter::new();
        let publisher = Arc::new(router.clone());
        let relay = Arc::new(SignalingRelay::new(publisher.clone()));
        let notifier = Arc::new(LifecycleNotifier::new(
            SessionRegistry::new(),
            publisher,
            &config.lifecycle,
        ));
        Self {
            router,
            relay,
            notifier,
            outbound_buffer: config.server.outbound_buffer,
            max_message_bytes: config.server.max_message_bytes,
        }
    }

    fn ws_config(&self) -> WebSocketConfig {
        WebSocketConfig::default()
            .max_message_size(Some(self.max_message_bytes))
            .max_frame_size(Some(self.max_message_bytes))
    }
}

/// Accept connections until `shutdown` resolves, then close the router so
/// later publishes fail fast.
pub async fn serve(listener: TcpListener, ctx: RelayContext, shutdown: impl Future<Output = ()>) {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let ctx = ctx.clone();
                    tokio::spawn(async move {
                        match accept_async_with_config(stream, Some(ctx.ws_config())).await {
                            Ok(ws) => handle_connection(ws, addr, ctx).await,
                            Err(e) => {
                                tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                            }
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "TCP accept error");
                }
            },
            _ = &mut shutdown => {
                tracing::info!("Shutting down, closing topic router");
                ctx.router.close().await;
                break;
            }
        }
    }
}
