//! Result URL extraction from the upstream reply.
//!
//! The upstream contract is not pinned down yet; known replies carry the
//! result either under `url` or under `output`. Both are checked in the
//! order given by [`UrlField::PRIORITY`], and only string values count.

use serde_json::{Map, Value};
use std::fmt;

use crate::generate::error::GenerateError;

/// Top-level reply field that may carry the result URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlField {
    Url,
    Output,
}

impl UrlField {
    /// Lookup order; the first field holding a string wins.
    pub const PRIORITY: [UrlField; 2] = [UrlField::Url, UrlField::Output];

    pub fn key(self) -> &'static str {
        match self {
            UrlField::Url => "url",
            UrlField::Output => "output",
        }
    }
}

impl fmt::Display for UrlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A URL pulled out of an upstream reply, tagged with its source field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUrl {
    pub field: UrlField,
    pub url: String,
}

/// Parse an upstream body and pick the result URL.
///
/// A body of `null` is treated as an empty object. Any other non-object
/// body is a parse failure.
pub fn extract_video_url(body: &[u8]) -> Result<VideoUrl, GenerateError> {
    let reply: Option<Map<String, Value>> =
        serde_json::from_slice(body).map_err(GenerateError::MalformedResponse)?;
    let reply = reply.unwrap_or_default();

    UrlField::PRIORITY
        .into_iter()
        .find_map(|field| match reply.get(field.key()) {
            Some(Value::String(url)) => Some(VideoUrl {
                field,
                url: url.clone(),
            }),
            _ => None,
        })
        .ok_or(GenerateError::UrlNotFound)
}
