//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use video_proxy::config::ProxyConfig;
use video_proxy::http::HttpServer;
use video_proxy::lifecycle::Shutdown;

pub const TEST_API_KEY: &str = "test-key";

/// One request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Captured {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A running mock generation API.
pub struct MockUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}/v1/generate", self.addr)
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

/// Start a programmable upstream. `f` decides the status and raw body for
/// each request it receives.
pub async fn start_upstream<F, Fut>(f: F) -> MockUpstream
where
    F: Fn(Captured) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let sink = captured.clone();
    let handler = move |headers: HeaderMap, body: Bytes| {
        let f = f.clone();
        let sink = sink.clone();
        async move {
            let request = Captured { headers, body };
            sink.lock().unwrap().push(request.clone());
            let (status, body) = f(request).await;
            (StatusCode::from_u16(status).unwrap(), body)
        }
    };

    let app = Router::new().route("/v1/generate", post(handler));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, captured }
}

/// Start an upstream that always answers with the same status and body.
pub async fn start_fixed_upstream(status: u16, body: &'static str) -> MockUpstream {
    start_upstream(move |_| async move { (status, body.to_string()) }).await
}

/// An address nothing is listening on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Default config pointed at `upstream_url` with the test credential.
pub fn proxy_config(upstream_url: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.upstream.api_key = Some(TEST_API_KEY.into());
    config.upstream.api_url = Some(upstream_url.into());
    config.timeouts.request_secs = 10;
    config.timeouts.upstream_secs = 5;
    config.timeouts.connect_secs = 2;
    config
}

/// A proxy running on an ephemeral port.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<ProxyConfig>,
    pub shutdown: Shutdown,
}

impl TestProxy {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn generate_url(&self) -> String {
        format!("http://{}/api/generate", self.addr)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_proxy(config: ProxyConfig) -> TestProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (updates, config_updates) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    TestProxy {
        addr,
        updates,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// POST a raw body to the proxy and decode the JSON reply.
pub async fn post_raw(proxy: &TestProxy, body: &str) -> (reqwest::StatusCode, Value) {
    let res = client()
        .post(proxy.generate_url())
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = res.status();
    let body = res.json().await.unwrap();
    (status, body)
}

pub async fn post_prompt(proxy: &TestProxy, prompt: &str) -> (reqwest::StatusCode, Value) {
    post_raw(proxy, &serde_json::json!({ "prompt": prompt }).to_string()).await
}
