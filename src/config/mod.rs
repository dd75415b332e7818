//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (optional, loaded into the process environment)
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, overlay AI_API_KEY / AI_API_URL / PORT)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via ArcSwap with the request handler
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<ProxyConfig>
//!     → next request reads the new snapshot
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CorsConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig,
    TimeoutConfig, UpstreamConfig, UpstreamCredentials,
};
pub use validation::ValidationError;
