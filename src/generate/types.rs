//! Wire types for the generation endpoint.

use serde::{Deserialize, Serialize};

/// Body accepted on `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
}

/// Body returned from `POST /api/generate`.
///
/// Exactly one of `video_url` / `error` is set, depending on `success`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerationResponse {
    pub success: bool,

    #[serde(rename = "videoUrl", default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResponse {
    pub fn success(video_url: impl Into<String>) -> Self {
        Self {
            success: true,
            video_url: Some(video_url.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            video_url: None,
            error: Some(message.into()),
        }
    }
}

/// Body sent to the upstream generation API.
#[derive(Debug, Serialize)]
pub struct UpstreamPayload<'a> {
    pub prompt: &'a str,
}
