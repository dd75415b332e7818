//! Outbound client for the upstream generation API.
//!
//! # Responsibilities
//! - Send the prompt as a JSON POST with a bearer credential
//! - Bound the call with the configured upstream timeout
//! - Map transport failures and non-200 replies onto [`GenerateError`]
//! - Hand the raw body to [`extract_video_url`]
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` per process; credentials are per call so a
//!   config reload takes effect on the next request
//! - Only status 200 counts as success
//! - Upstream error bodies are logged, never returned to the caller

use axum::http::StatusCode;
use std::time::Duration;

use crate::config::{TimeoutConfig, UpstreamCredentials};
use crate::generate::error::GenerateError;
use crate::generate::extract::{extract_video_url, VideoUrl};
use crate::generate::types::UpstreamPayload;
use crate::http::request::X_REQUEST_ID;

/// Error body bytes included in the warn log for a non-200 upstream reply.
const MAX_LOGGED_BODY: usize = 4096;

/// Pooled HTTP client for the generation API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Build the client. The connect timeout is fixed for the process lifetime.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeouts.connect())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Submit `prompt` upstream and return the extracted result URL.
    pub async fn generate(
        &self,
        target: &UpstreamCredentials,
        prompt: &str,
        request_id: Option<&str>,
        timeout: Duration,
    ) -> Result<VideoUrl, GenerateError> {
        let mut request = self
            .http
            .post(&target.api_url)
            .bearer_auth(&target.api_key)
            .timeout(timeout)
            .json(&UpstreamPayload { prompt });
        if let Some(id) = request_id {
            request = request.header(X_REQUEST_ID, id);
        }

        let response = request
            .send()
            .await
            .map_err(GenerateError::from_transport)?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(GenerateError::from_transport)?;

        if status != StatusCode::OK {
            let text = String::from_utf8_lossy(&body);
            tracing::warn!(
                request_id = request_id.unwrap_or("unknown"),
                status = status.as_u16(),
                body = %truncate(&text, MAX_LOGGED_BODY),
                "Upstream returned error"
            );
            return Err(GenerateError::UpstreamStatus(status));
        }

        let found = extract_video_url(&body);
        if let Err(GenerateError::MalformedResponse(ref e)) = found {
            tracing::warn!(
                request_id = request_id.unwrap_or("unknown"),
                error = %e,
                "Upstream reply is not a JSON object"
            );
        }
        found
    }
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
