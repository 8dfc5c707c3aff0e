//! tether-hub binary: run the local window broadcast hub.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use tether_hub::{serve, PeerTable};

#[derive(Parser)]
#[command(name = "tether-hub", about = "Local broadcast hub for tether window processes")]
struct Args {
    /// Port to listen on. Defaults to `hub.port` from the config.
    #[arg(short, long)]
    port: Option<u16>,

    /// Config file path override.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = tether_config::load_config_from(args.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("tether-hub: config load failed, using defaults: {e}");
        tether_config::TetherConfig::default()
    });

    let directive = args
        .log_level
        .map(|level| format!("tether={level}"))
        .unwrap_or_else(|| config.logging.level.directive());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| directive.into()),
        )
        .init();

    let port = args.port.unwrap_or(config.hub.port);
    let addr = format!("127.0.0.1:{port}");
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind hub listener");
            std::process::exit(1);
        }
    };

    tracing::info!("tether-hub listening on {}", addr);

    let peers = PeerTable::new();
    tokio::select! {
        _ = serve(listener, peers.clone()) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(peers = peers.count().await, "tether-hub shutting down");
        }
    }
}
