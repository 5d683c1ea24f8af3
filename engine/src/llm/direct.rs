//! Direct Remote API Provider
//!
//! The last tier: calls the hosted model's chat endpoint directly, bypassing
//! the primary gateway. Attempted only in live mode and only when explicitly
//! enabled in config.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{join_url, send_and_read, InferenceProvider, Result, Tier};

#[derive(Clone)]
pub struct DirectProvider {
    base_url: String,

    /// Sent as X-API-Key when present
    api_key: Option<String>,

    timeout: Duration,

    client: Client,
}

// Manual Debug so the API key never reaches logs
impl std::fmt::Debug for DirectProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl DirectProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self::with_client(base_url, api_key, timeout, Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            timeout,
            client,
        }
    }
}

#[async_trait]
impl InferenceProvider for DirectProvider {
    fn id(&self) -> &str {
        "direct"
    }

    fn tier(&self) -> Tier {
        Tier::Direct
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String> {
        let url = join_url(&self.base_url, "/chat");
        tracing::debug!("Direct API request: url={}, prompt_chars={}", url, prompt.len());

        let mut request = self.client.post(&url).json(&ChatRequest::new(prompt));
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }

        send_and_read(request, timeout, |_| None).await
    }

    async fn check_health(&self) -> bool {
        let mut request = self
            .client
            .get(join_url(&self.base_url, "/health"))
            .timeout(Duration::from_secs(5));
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }

        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Direct API health check failed: {}", e);
                false
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    query: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    repetition_penalty: f32,
}

impl<'a> ChatRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            query: prompt,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
            max_tokens: 1000,
            top_p: 1.0,
            repetition_penalty: 1.1,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}
