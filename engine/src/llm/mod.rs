//! Inference Provider Abstraction Layer
//!
//! This module provides a common interface for the interchangeable inference
//! backends the gateway can query (primary gateway, self-hosted inference,
//! direct remote API). The `InferenceProvider` trait defines the contract
//! every tier implements, enabling the dispatcher to walk the chain without
//! knowing any tier's wire format.
//!
//! All tiers share one request shape, `{"query": <prompt>, ...extras}`, and
//! one reply shape with `answer` as the preferred field. Adapters differ only
//! in their extras, headers and the alternate answer fields they accept.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;

pub mod direct;
pub mod dispatcher;
pub mod primary;
pub mod self_hosted;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur during a single provider attempt
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// 503 from the primary tier: the upstream model is unreachable
    #[error("Upstream capacity unavailable")]
    UpstreamUnavailable,

    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    #[error("Empty answer")]
    EmptyAnswer,

    #[error("Rejected stub answer (matched '{0}')")]
    RejectedAnswer(&'static str),

    #[error("Cancelled by caller")]
    Cancelled,
}

/// Position of a provider in the fixed priority chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Primary,
    SelfHosted,
    Direct,
}

impl Tier {
    /// Lower ranks are attempted first
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Primary => 0,
            Tier::SelfHosted => 1,
            Tier::Direct => 2,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Primary => write!(f, "primary"),
            Tier::SelfHosted => write!(f, "self_hosted"),
            Tier::Direct => write!(f, "direct"),
        }
    }
}

/// Inference provider trait that all tiers must implement
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Identifier reported back to callers (e.g., "primary", "ollama")
    fn id(&self) -> &str;

    /// Tier this provider occupies in the chain
    fn tier(&self) -> Tier;

    /// Declared timeout budget for one attempt
    fn timeout(&self) -> Duration;

    /// Send one prompt and return the raw answer text
    ///
    /// Exactly one outbound request per call, no retries. The request is
    /// abandoned once `timeout` elapses.
    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String>;

    /// Check if the provider is currently healthy and available
    /// Default implementation returns true.
    async fn check_health(&self) -> bool {
        true
    }
}

/// Reply shape accepted from every tier
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProviderReply {
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub answer: Option<String>,

    /// Self-hosted generate endpoints
    #[serde(default)]
    pub response: Option<String>,

    /// OpenAI-style chat completions
    #[serde(default, deserialize_with = "null_as_empty")]
    pub choices: Vec<ReplyChoice>,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[allow(dead_code)]
    pub sources: Vec<serde_json::Value>,
}

/// Treat an explicit `null` list the same as a missing one
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyChoice {
    pub message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyMessage {
    #[serde(default)]
    pub content: String,
}

impl ProviderReply {
    /// Pick the answer text: `answer`, then `response`, then the first choice
    pub fn into_text(self) -> Result<String> {
        if self.success == Some(false) {
            return Err(ProviderError::MalformedBody(
                "provider reported success=false".to_string(),
            ));
        }

        let text = self
            .answer
            .filter(|a| !a.trim().is_empty())
            .or(self.response.filter(|r| !r.trim().is_empty()))
            .or_else(|| self.choices.into_iter().next().map(|c| c.message.content))
            .unwrap_or_default();

        let text = sanitize_answer(&text);
        if text.is_empty() {
            Err(ProviderError::EmptyAnswer)
        } else {
            Ok(text)
        }
    }
}

/// Strip replacement, control and zero-width characters, then trim
pub fn sanitize_answer(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            let zero_width = matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}' | '\u{2060}');
            let control = c.is_control() && !matches!(c, '\n' | '\r' | '\t');
            c != '\u{FFFD}' && !zero_width && !control
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Send a prepared request and decode the reply into answer text
///
/// `on_status` lets a tier map specific non-2xx codes before the generic
/// `HttpStatus` mapping applies.
pub(crate) async fn send_and_read(
    request: RequestBuilder,
    timeout: Duration,
    on_status: impl Fn(u16) -> Option<ProviderError>,
) -> Result<String> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| map_transport_error(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Provider returned {}: {}", code, truncate(&body, 200));
        return Err(on_status(code).unwrap_or(ProviderError::HttpStatus(code)));
    }

    let reply: ProviderReply = response.json().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::Timeout(timeout)
        } else {
            ProviderError::MalformedBody(e.to_string())
        }
    })?;

    reply.into_text()
}

fn map_transport_error(e: reqwest::Error, timeout: Duration) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::Network(e.to_string())
    }
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
