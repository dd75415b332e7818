//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Root configuration for the generation proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Upstream generation API settings.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Cross-origin policy for browser clients.
    pub cors: CorsConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Overridden by `PORT`.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Upstream generation API configuration.
///
/// Both values are optional at load time. A request arriving while either is
/// unset is answered with a configuration error instead of failing startup.
#[derive(Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Bearer credential. Overridden by `AI_API_KEY`.
    pub api_key: Option<String>,

    /// Full URL of the generation endpoint. Overridden by `AI_API_URL`.
    pub api_url: Option<String>,
}

// Hand-written so the credential never reaches a log line.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Resolved upstream target, only built when both values are present.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamCredentials {
    pub api_key: String,
    pub api_url: String,
}

impl std::fmt::Debug for UpstreamCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamCredentials")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl UpstreamConfig {
    /// Returns the credential and URL, or `None` if either is missing or empty.
    pub fn credentials(&self) -> Option<UpstreamCredentials> {
        let api_key = self.api_key.as_deref().filter(|v| !v.is_empty())?;
        let api_url = self.api_url.as_deref().filter(|v| !v.is_empty())?;
        Some(UpstreamCredentials {
            api_key: api_key.to_string(),
            api_url: api_url.to_string(),
        })
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for an inbound request, in seconds.
    pub request_secs: u64,

    /// Time allowed for the outbound generation call, in seconds.
    pub upstream_secs: u64,

    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn upstream(&self) -> Duration {
        Duration::from_secs(self.upstream_secs)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 120,
            upstream_secs: 60,
            connect_secs: 10,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API (exact match).
    pub allowed_origins: Vec<String>,

    /// Methods allowed in cross-origin requests.
    pub allowed_methods: Vec<String>,

    /// Request headers allowed in cross-origin requests.
    pub allowed_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allowed_methods: vec!["POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec![
                "Origin".to_string(),
                "Content-Type".to_string(),
                "Authorization".to_string(),
            ],
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl ObservabilityConfig {
    pub fn metrics_socket_addr(&self) -> Option<SocketAddr> {
        self.metrics_address.parse().ok()
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
