//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check the upstream URL and CORS values parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - A missing credential or URL is not an error here; requests report it

use axum::http::{HeaderName, HeaderValue, Method};
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.upstream_secs ({upstream}) must be less than timeouts.request_secs ({request})")]
    UpstreamTimeoutTooLong { upstream: u64, request: u64 },

    #[error("limits.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("upstream.api_url is not a valid http(s) URL: {0}")]
    InvalidUpstreamUrl(String),

    #[error("cors.allowed_origins contains an invalid origin: {0}")]
    InvalidCorsOrigin(String),

    #[error("cors.allowed_methods contains an invalid method: {0}")]
    InvalidCorsMethod(String),

    #[error("cors.allowed_headers contains an invalid header: {0}")]
    InvalidCorsHeader(String),

    #[error("observability.metrics_address is not a socket address: {0}")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("request_secs", timeouts.request_secs),
        ("upstream_secs", timeouts.upstream_secs),
        ("connect_secs", timeouts.connect_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }
    if timeouts.upstream_secs >= timeouts.request_secs && timeouts.request_secs > 0 {
        errors.push(ValidationError::UpstreamTimeoutTooLong {
            upstream: timeouts.upstream_secs,
            request: timeouts.request_secs,
        });
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if let Some(api_url) = config.upstream.api_url.as_deref().filter(|u| !u.is_empty()) {
        match url::Url::parse(api_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => errors.push(ValidationError::InvalidUpstreamUrl(api_url.to_string())),
        }
    }

    for origin in &config.cors.allowed_origins {
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::InvalidCorsOrigin(origin.clone()));
        }
    }
    for method in &config.cors.allowed_methods {
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidCorsMethod(method.clone()));
        }
    }
    for header in &config.cors.allowed_headers {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidCorsHeader(header.clone()));
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
