//! Prompt-to-video generation subsystem.
//!
//! # Data Flow
//! ```text
//! GenerationRequest (validated prompt)
//!     → upstream.rs (POST to generation API, bearer credential)
//!     → extract.rs (pick `url`, else `output`)
//!     → VideoUrl
//!     → GenerationResponse (or GenerateError → status + message)
//! ```

pub mod error;
pub mod extract;
pub mod types;
pub mod upstream;

pub use error::GenerateError;
pub use extract::{extract_video_url, UrlField, VideoUrl};
pub use types::{GenerationRequest, GenerationResponse, UpstreamPayload};
pub use upstream::UpstreamClient;

/// Parse and validate an inbound request body.
///
/// Any body that is not a JSON object with a non-empty string `prompt` is
/// rejected. Whitespace is content and is forwarded as-is.
pub fn parse_request(body: &[u8]) -> Result<GenerationRequest, GenerateError> {
    let request: GenerationRequest =
        serde_json::from_slice(body).map_err(|_| GenerateError::InvalidRequest)?;
    if request.prompt.is_empty() {
        return Err(GenerateError::InvalidRequest);
    }
    Ok(request)
}
