//! Prompt-to-video generation proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request            ┌──────────────────────────────────────────────┐
//!     ──────────────────────────┼─▶ request id → trace → cors → limits         │
//!                               │        │                                      │
//!                               │        ▼                                      │
//!                               │  POST /api/generate                           │
//!                               │   validate prompt → read config snapshot      │
//!                               │        │                                      │
//!                               │        ▼                                      │
//!                               │   UpstreamClient ──── POST + Bearer ──────────┼──▶ Generation API
//!                               │        │                                      │
//!                               │        ▼                                      │
//!     Client Response           │   extract `url` | `output`                    │
//!     ◀─────────────────────────┼── { success, videoUrl | error }               │
//!                               │                                               │
//!                               │  config (TOML + env, hot reload)              │
//!                               │  observability (tracing, prometheus)          │
//!                               │  lifecycle (signals, graceful shutdown)       │
//!                               └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use video_proxy::config::load_config;
use video_proxy::config::watcher::ConfigWatcher;
use video_proxy::lifecycle::{wait_for_signal, Shutdown};
use video_proxy::observability::{logging, metrics};
use video_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "video-proxy", version)]
#[command(about = "Relays text prompts to a video generation API", long_about = None)]
struct Args {
    /// Optional TOML configuration file; watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let dotenv = dotenvy::dotenv();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("video-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = dotenv {
        tracing::warn!(error = %e, "No .env file loaded, relying on process environment");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream_configured = config.upstream.credentials().is_some(),
        upstream_timeout_secs = config.timeouts.upstream_secs,
        request_timeout_secs = config.timeouts.request_secs,
        config_file = ?args.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_socket_addr() {
            Some(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            None => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // The watcher handle must outlive the server for reloads to keep flowing.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(handle) => (updates, Some(handle)),
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload disabled");
                    (updates, None)
                }
            }
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
