//! Route handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::generate::{parse_request, GenerateError, GenerationResponse, VideoUrl};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/generate`: validate the prompt, call upstream, relay the URL.
///
/// The body is taken as raw bytes so that any content type is accepted and
/// every malformed body maps to the same client error.
pub async fn generate_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);

    match run_generation(&state, request_id, &body).await {
        Ok(found) => {
            metrics::record_generation(StatusCode::OK, start_time);
            tracing::info!(
                request_id = request_id.unwrap_or("unknown"),
                field = %found.field,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Generation succeeded"
            );
            (StatusCode::OK, Json(GenerationResponse::success(found.url))).into_response()
        }
        Err(e) => {
            let status = e.status_code();
            metrics::record_generation(status, start_time);
            log_failure(request_id.unwrap_or("unknown"), &e, start_time);
            e.into_response()
        }
    }
}

async fn run_generation(
    state: &AppState,
    request_id: Option<&str>,
    body: &[u8],
) -> Result<VideoUrl, GenerateError> {
    let request = parse_request(body)?;

    let (target, timeout) = {
        let config = state.config.load();
        let target = config
            .upstream
            .credentials()
            .ok_or(GenerateError::MissingConfig)?;
        (target, config.timeouts.upstream())
    };

    tracing::debug!(
        request_id = request_id.unwrap_or("unknown"),
        prompt_len = request.prompt.len(),
        "Forwarding prompt upstream"
    );

    state
        .upstream
        .generate(&target, &request.prompt, request_id, timeout)
        .await
}

fn log_failure(request_id: &str, error: &GenerateError, start_time: Instant) {
    let status = error.status_code().as_u16();
    let elapsed_ms = start_time.elapsed().as_millis() as u64;
    let source = std::error::Error::source(error).map(ToString::to_string);

    if error.status_code().is_client_error() {
        tracing::info!(request_id, status, elapsed_ms, error = %error, "Rejected request");
    } else {
        tracing::error!(
            request_id,
            status,
            elapsed_ms,
            error = %error,
            source = source.as_deref().unwrap_or(""),
            "Generation failed"
        );
    }
}
