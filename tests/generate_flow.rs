//! End-to-end generation through a mock upstream.

use reqwest::StatusCode;
use serde_json::json;
use video_proxy_sdk::GenerateClient;

mod common;

#[tokio::test]
async fn test_end_to_end_url() {
    let upstream = common::start_fixed_upstream(200, r#"{"url":"http://x/a.mp4"}"#).await;
    let proxy = common::start_proxy(common::proxy_config(&upstream.url())).await;

    let (status, body) = common::post_prompt(&proxy, "a cat").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "videoUrl": "http://x/a.mp4"}));
}

#[tokio::test]
async fn test_upstream_receives_prompt_and_bearer() {
    let upstream = common::start_fixed_upstream(200, r#"{"url":"http://x/a.mp4"}"#).await;
    let proxy = common::start_proxy(common::proxy_config(&upstream.url())).await;

    let (status, _) = common::post_prompt(&proxy, "a cat").await;
    assert_eq!(status, StatusCode::OK);

    let captured = upstream.captured();
    assert_eq!(captured.len(), 1);
    let request = &captured[0];
    assert_eq!(
        request.header("authorization"),
        Some(format!("Bearer {}", common::TEST_API_KEY).as_str())
    );
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.json(), json!({"prompt": "a cat"}));
    assert!(request.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_whitespace_prompt_is_forwarded_verbatim() {
    let upstream = common::start_fixed_upstream(200, r#"{"url":"http://x/a.mp4"}"#).await;
    let proxy = common::start_proxy(common::proxy_config(&upstream.url())).await;

    let (status, body) = common::post_prompt(&proxy, "   ").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "videoUrl": "http://x/a.mp4"}));
    let captured = upstream.captured();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].json(), json!({"prompt": "   "}));
}

#[tokio::test]
async fn test_output_fallback() {
    let upstream =
        common::start_fixed_upstream(200, r#"{"status":"done","output":"http://x/b.mp4"}"#).await;
    let proxy = common::start_proxy(common::proxy_config(&upstream.url())).await;

    let (status, body) = common::post_prompt(&proxy, "a dog").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "videoUrl": "http://x/b.mp4"}));
}

#[tokio::test]
async fn test_url_takes_priority_over_output() {
    let upstream = common::start_fixed_upstream(
        200,
        r#"{"output":"http://x/second.mp4","url":"http://x/first.mp4"}"#,
    )
    .await;
    let proxy = common::start_proxy(common::proxy_config(&upstream.url())).await;

    let (status, body) = common::post_prompt(&proxy, "a bird").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videoUrl"], json!("http://x/first.mp4"));
}

#[tokio::test]
async fn test_extra_request_fields_are_not_forwarded() {
    let upstream = common::start_fixed_upstream(200, r#"{"url":"http://x/a.mp4"}"#).await;
    let proxy = common::start_proxy(common::proxy_config(&upstream.url())).await;

    let (status, _) =
        common::post_raw(&proxy, r#"{"prompt":"a cat","style":"anime","duration":5}"#).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(upstream.captured()[0].json(), json!({"prompt": "a cat"}));
}

#[tokio::test]
async fn test_client_request_id_forwarded_and_echoed() {
    let upstream = common::start_fixed_upstream(200, r#"{"url":"http://x/a.mp4"}"#).await;
    let proxy = common::start_proxy(common::proxy_config(&upstream.url())).await;

    let res = common::client()
        .post(proxy.generate_url())
        .header("x-request-id", "trace-me-42")
        .json(&json!({"prompt": "a cat"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "trace-me-42");
    assert_eq!(
        upstream.captured()[0].header("x-request-id"),
        Some("trace-me-42")
    );
}

#[tokio::test]
async fn test_non_json_content_type_is_accepted() {
    let upstream = common::start_fixed_upstream(200, r#"{"url":"http://x/a.mp4"}"#).await;
    let proxy = common::start_proxy(common::proxy_config(&upstream.url())).await;

    let res = common::client()
        .post(proxy.generate_url())
        .header("content-type", "text/plain")
        .body(r#"{"prompt":"a cat"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sdk_client() {
    let upstream = common::start_fixed_upstream(200, r#"{"url":"http://x/sdk.mp4"}"#).await;
    let proxy = common::start_proxy(common::proxy_config(&upstream.url())).await;
    let client = GenerateClient::new(&proxy.base_url());

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");

    let outcome = client.generate("a cat").await.unwrap();
    assert_eq!(outcome.status, StatusCode::OK);
    assert!(outcome.response.success);
    assert_eq!(outcome.response.video_url.as_deref(), Some("http://x/sdk.mp4"));
    assert!(outcome.response.error.is_none());

    let outcome = client.generate("").await.unwrap();
    assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
    assert!(!outcome.response.success);
}

#[tokio::test]
async fn test_cors_preflight() {
    let upstream = common::start_fixed_upstream(200, r#"{"url":"http://x/a.mp4"}"#).await;
    let proxy = common::start_proxy(common::proxy_config(&upstream.url())).await;

    let res = common::client()
        .request(reqwest::Method::OPTIONS, proxy.generate_url())
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
    assert!(upstream.captured().is_empty());
}
