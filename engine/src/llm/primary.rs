//! Primary Gateway Provider
//!
//! The first tier: the platform's own AI gateway, which fronts the hosted
//! fine-tuned model and enriches the prompt with retrieved context.
//!
//! Wire format:
//! - `POST <endpoint>` with `{"query": <prompt>, "topK": 5}`
//! - reply `{"success": bool, "answer": string, "sources"?: [...]}`
//! - 503 means the gateway is up but cannot reach its model; it is reported
//!   as `UpstreamUnavailable` so the dispatcher moves straight on.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{send_and_read, InferenceProvider, ProviderError, Result, Tier};

/// Number of retrieved context documents requested from the gateway
const TOP_K: u32 = 5;

#[derive(Debug, Clone)]
pub struct PrimaryGatewayProvider {
    /// Full URL of the query endpoint (e.g. http://localhost:3001/api/ai/query)
    endpoint: String,

    timeout: Duration,

    client: Client,
}

impl PrimaryGatewayProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(endpoint, timeout, Client::new())
    }

    /// Share an existing connection pool
    pub fn with_client(endpoint: impl Into<String>, timeout: Duration, client: Client) -> Self {
        Self {
            endpoint: endpoint.into().trim().to_string(),
            timeout,
            client,
        }
    }

    /// Health URL: the query endpoint with its trailing `/query` swapped for `/health`
    fn health_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        match base.strip_suffix("/query") {
            Some(prefix) => format!("{}/health", prefix),
            None => format!("{}/health", base),
        }
    }
}

#[async_trait]
impl InferenceProvider for PrimaryGatewayProvider {
    fn id(&self) -> &str {
        "primary"
    }

    fn tier(&self) -> Tier {
        Tier::Primary
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String> {
        tracing::debug!(
            "Primary gateway request: endpoint={}, prompt_chars={}",
            self.endpoint,
            prompt.len()
        );

        let request = self.client.post(&self.endpoint).json(&PrimaryRequest {
            query: prompt,
            top_k: TOP_K,
        });

        send_and_read(request, timeout, |status| {
            (status == 503).then_some(ProviderError::UpstreamUnavailable)
        })
        .await
    }

    async fn check_health(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Primary gateway health check failed: {}", e);
                false
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct PrimaryRequest<'a> {
    query: &'a str,
    #[serde(rename = "topK")]
    top_k: u32,
}
