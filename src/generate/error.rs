//! Error taxonomy for a single generation request.

use axum::http::StatusCode;
use thiserror::Error;

/// Every way a generation request can fail.
///
/// The `Display` text is what the client sees in the `error` field, so it
/// never includes upstream bodies or source error details.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Body was not JSON, or the prompt was missing or empty.
    #[error("Invalid request: prompt is required")]
    InvalidRequest,

    /// Credential or upstream URL not configured.
    #[error("Server configuration error: API Key or URL missing")]
    MissingConfig,

    /// The outbound request could not be constructed.
    #[error("Failed to create request")]
    RequestBuild(#[source] reqwest::Error),

    /// Connection, transport or timeout failure talking to the upstream.
    #[error("Failed to contact AI provider")]
    Unreachable(#[source] reqwest::Error),

    /// Upstream answered with anything other than 200.
    #[error("AI Provider returned error: {}", .0.as_u16())]
    UpstreamStatus(StatusCode),

    /// Upstream body was not a JSON object.
    #[error("Failed to parse AI response")]
    MalformedResponse(#[source] serde_json::Error),

    /// Upstream body had no string under any known URL field.
    #[error("Video URL not found in response")]
    UrlNotFound,
}

impl GenerateError {
    /// HTTP status returned to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GenerateError::InvalidRequest => StatusCode::BAD_REQUEST,
            GenerateError::MissingConfig
            | GenerateError::RequestBuild(_)
            | GenerateError::MalformedResponse(_)
            | GenerateError::UrlNotFound => StatusCode::INTERNAL_SERVER_ERROR,
            GenerateError::Unreachable(_) | GenerateError::UpstreamStatus(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Classify a reqwest failure from sending or reading the upstream call.
    ///
    /// An elapsed upstream timeout is a transport failure like any other.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            GenerateError::RequestBuild(err)
        } else {
            GenerateError::Unreachable(err)
        }
    }
}
