//! Stand-in generation API for local runs.
//!
//! ```text
//! cargo run --example mock_upstream
//! AI_API_KEY=dev AI_API_URL=http://127.0.0.1:8090/v1/generate cargo run
//! ```

use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;

async fn generate(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "missing bearer token"})));
    }

    let prompt = body["prompt"].as_str().unwrap_or_default();
    println!("Generating video for prompt: {prompt:?}");
    (
        StatusCode::OK,
        Json(json!({"url": "https://www.w3schools.com/html/mov_bbb.mp4"})),
    )
}

#[tokio::main]
async fn main() {
    let app = Router::new().route("/v1/generate", post(generate));

    let addr = SocketAddr::from(([127, 0, 0, 1], 8090));
    println!("Mock generation API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
