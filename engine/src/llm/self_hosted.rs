//! Self-hosted Inference Provider
//!
//! The second tier: an Ollama-compatible inference server operated by the
//! platform team, typically at http://localhost:11434. Only attempted in
//! live mode.
//!
//! The request carries the shared `query` field plus the generate API's own
//! `model`, `prompt` and `stream` fields. The answer is read from `answer`
//! if present, otherwise from the generate API's `response`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{join_url, send_and_read, InferenceProvider, Result, Tier};

#[derive(Debug, Clone)]
pub struct SelfHostedProvider {
    /// Base URL of the inference server
    base_url: String,

    /// Model name to use (e.g., "mistral")
    model: String,

    timeout: Duration,

    client: Client,
}

impl SelfHostedProvider {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(base_url, model, timeout, Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout,
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl InferenceProvider for SelfHostedProvider {
    fn id(&self) -> &str {
        "self_hosted"
    }

    fn tier(&self) -> Tier {
        Tier::SelfHosted
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String> {
        tracing::debug!(
            "Self-hosted request: model={}, prompt_chars={}",
            self.model,
            prompt.len()
        );

        let url = join_url(&self.base_url, "/api/generate");
        let request = self.client.post(&url).json(&GenerateRequest {
            query: prompt,
            model: &self.model,
            prompt,
            stream: false,
        });

        send_and_read(request, timeout, |_| None).await
    }

    async fn check_health(&self) -> bool {
        let url = join_url(&self.base_url, "/api/tags");
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Self-hosted health check failed: {}", e);
                false
            }
        }
    }
}

/// Generate API request format
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    query: &'a str,
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_hosted_provider_properties() {
        let provider =
            SelfHostedProvider::new("http://localhost:11434", "mistral", Duration::from_secs(15));

        assert_eq!(provider.id(), "self_hosted");
        assert_eq!(provider.tier(), Tier::SelfHosted);
        assert_eq!(provider.model(), "mistral");
        assert_eq!(provider.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_generate_request_shape() {
        let body = serde_json::to_value(GenerateRequest {
            query: "q",
            model: "mistral",
            prompt: "q",
            stream: false,
        })
        .unwrap();

        assert_eq!(body["query"], "q");
        assert_eq!(body["prompt"], "q");
        assert_eq!(body["model"], "mistral");
        assert_eq!(body["stream"], false);
    }
}
