//! Cross-origin policy.
//!
//! # Responsibilities
//! - Translate [`CorsConfig`] into a tower-http `CorsLayer`
//! - Answer browser preflight requests for the configured origins only
//!
//! # Design Decisions
//! - A literal `*` entry means "any" for that list
//! - Entries that fail to parse are skipped with a warning; config
//!   validation rejects them before startup

use axum::http::{HeaderName, HeaderValue, Method};
use std::str::FromStr;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer for the configured policy.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if is_wildcard(&config.allowed_origins) {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(parse_all::<HeaderValue>(&config.allowed_origins, "origin"))
    };

    let methods = if is_wildcard(&config.allowed_methods) {
        AllowMethods::from(Any)
    } else {
        AllowMethods::list(parse_all::<Method>(&config.allowed_methods, "method"))
    };

    let headers = if is_wildcard(&config.allowed_headers) {
        AllowHeaders::from(Any)
    } else {
        AllowHeaders::list(parse_all::<HeaderName>(&config.allowed_headers, "header"))
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == "*")
}

fn parse_all<T: FromStr>(values: &[String], kind: &'static str) -> Vec<T> {
    values
        .iter()
        .filter_map(|v| match v.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!(kind, value = %v, "Ignoring invalid CORS entry");
                None
            }
        })
        .collect()
}
