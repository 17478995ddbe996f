use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use voice_signal_config::{load_config, validation};
use voice_signal_relay::{serve, RelayContext};

#[derive(Parser)]
#[command(name = "voice-signal-relay", about = "Signaling relay for peer-to-peer voice calls")]
struct Args {
    /// Path to a TOML config file (defaults to the platform config dir).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Delay before a new session is announced, in milliseconds.
    #[arg(long)]
    connect_delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> voice_signal_common::Result<()> {
    let args = Args::parse();

    let (mut config, source) = load_config(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(delay) = args.connect_delay_ms {
        config.lifecycle.connect_notice_delay_ms = delay;
    }
    validation::validate(&config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.filter)),
        )
        .init();

    tracing::info!(source = %source, "Configuration loaded");

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        delay_ms = config.lifecycle.connect_notice_delay_ms,
        pending_notice = ?config.lifecycle.pending_notice,
        "voice-signal-relay listening on {}",
        addr
    );

    serve(listener, RelayContext::from_config(&config), shutdown_signal()).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}
