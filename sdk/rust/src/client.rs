use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    prompt: &'a str,
}

/// Reply body from `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(rename = "videoUrl", default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// HTTP status plus decoded body. Failures still carry a JSON body.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub status: StatusCode,
    pub response: GenerationResponse,
}

#[derive(Debug, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

pub struct GenerateClient {
    client: Client,
    proxy_url: String,
}

impl GenerateClient {
    pub fn new(proxy_url: &str) -> Self {
        Self {
            client: Client::new(),
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a prompt. Non-2xx statuses are returned, not raised, as long as
    /// the proxy answered with its JSON envelope.
    pub async fn generate(&self, prompt: &str) -> Result<GenerateOutcome, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .post(format!("{}/api/generate", self.proxy_url))
            .json(&GenerationRequest { prompt })
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        match serde_json::from_str::<GenerationResponse>(&text) {
            Ok(response) => Ok(GenerateOutcome { status, response }),
            Err(_) => Err(format!("Proxy returned status {}: {}", status, text).into()),
        }
    }

    /// Fetch the proxy's liveness report.
    pub async fn health(&self) -> Result<HealthStatus, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.proxy_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}
