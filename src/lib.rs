//! Prompt-to-video generation proxy library.

pub mod config;
pub mod generate;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
