//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS)
//! - Bind server to listener
//! - Apply configuration reloads to the shared snapshot
//! - Drain in-flight requests on shutdown

use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ProxyConfig, ValidationError};
use crate::generate::UpstreamClient;
use crate::http::handlers::{generate_video, health};
use crate::http::request::MakeRequestUuidV4;
use crate::observability::tracing::make_request_span;
use crate::security::cors::build_cors_layer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Current configuration; replaced wholesale on reload.
    pub config: Arc<ArcSwap<ProxyConfig>>,
    pub upstream: UpstreamClient,
}

/// HTTP server for the generation proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ArcSwap<ProxyConfig>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(&config.timeouts)?;
        let shared = Arc::new(ArcSwap::from_pointee(config.clone()));

        let state = AppState {
            config: shared.clone(),
            upstream,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config: shared,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/generate", post(generate_video))
            .route("/health", get(health))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TimeoutLayer::new(config.timeouts.request()))
            .layer(build_cors_layer(&config.cors))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Snapshot of the configuration currently in effect.
    pub fn config(&self) -> Arc<ProxyConfig> {
        self.config.load_full()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the current
    /// snapshot; the server stops accepting and drains once `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ProxyConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if self.config.load().upstream.credentials().is_none() {
            tracing::warn!(
                "AI_API_KEY or AI_API_URL not set; /api/generate will answer 500 until configured"
            );
        }

        let shared = self.config.clone();
        let request_secs = shared.load().timeouts.request_secs;
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                let new_config = tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => config,
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                };

                match pin_request_timeout(new_config, request_secs) {
                    Ok(new_config) => {
                        tracing::info!(
                            upstream_configured = new_config.upstream.credentials().is_some(),
                            upstream_timeout_secs = new_config.timeouts.upstream_secs,
                            "Applying reloaded configuration"
                        );
                        shared.store(Arc::new(new_config));
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Rejected reloaded configuration, keeping current configuration"
                        );
                    }
                }
            }
            tracing::debug!("Config reload task stopped");
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// The whole-request timeout layer is built once at startup, so a reload
/// keeps the running `request_secs` and its upstream timeout must stay below
/// it.
fn pin_request_timeout(
    mut config: ProxyConfig,
    request_secs: u64,
) -> Result<ProxyConfig, ValidationError> {
    if config.timeouts.upstream_secs >= request_secs {
        return Err(ValidationError::UpstreamTimeoutTooLong {
            upstream: config.timeouts.upstream_secs,
            request: request_secs,
        });
    }
    if config.timeouts.request_secs != request_secs {
        tracing::warn!(
            requested = config.timeouts.request_secs,
            running = request_secs,
            "timeouts.request_secs only applies at startup; keeping the running value"
        );
        config.timeouts.request_secs = request_secs;
    }
    Ok(config)
}
