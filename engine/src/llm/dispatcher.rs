//! Provider Dispatcher
//!
//! Walks the provider chain for one prompt and returns the first usable
//! answer. Tiers are attempted strictly one after another in fixed order:
//! primary gateway, self-hosted inference, then the direct remote API.
//!
//! Every provider failure, timeout and stub rejection is logged and
//! swallowed here. `DispatchOutcome::Exhausted` is an ordinary result, the
//! caller decides what to do with it.

use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use super::direct::DirectProvider;
use super::primary::PrimaryGatewayProvider;
use super::self_hosted::SelfHostedProvider;
use super::{truncate, InferenceProvider, ProviderError, Tier};
use crate::config::{AiMode, GatewayConfig};

/// Markers that identify a stub reply from a misconfigured provider
const REJECTION_MARKERS: &[&str] = &["demo answer", "placeholder"];

/// Record of one provider attempt within a dispatch
#[derive(Debug, Clone)]
pub struct ProviderAttempt {
    pub provider_id: String,
    pub tier: Tier,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub timeout: Duration,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Accepted,
    Failed(ProviderError),
}

impl AttemptOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AttemptOutcome::Accepted)
    }
}

/// Terminal state of one dispatch
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Answered {
        text: String,
        provider_id: String,
        attempts: Vec<ProviderAttempt>,
    },
    Exhausted {
        attempts: Vec<ProviderAttempt>,
    },
}

impl DispatchOutcome {
    pub fn attempts(&self) -> &[ProviderAttempt] {
        match self {
            DispatchOutcome::Answered { attempts, .. } => attempts,
            DispatchOutcome::Exhausted { attempts } => attempts,
        }
    }

    pub fn provider_id(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Answered { provider_id, .. } => Some(provider_id),
            DispatchOutcome::Exhausted { .. } => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, DispatchOutcome::Exhausted { .. })
    }
}

/// Returns the stub marker contained in `text`, if any
pub fn rejection_marker(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    REJECTION_MARKERS
        .iter()
        .copied()
        .find(|marker| lower.contains(marker))
}

/// Ordered chain of inference providers
pub struct Dispatcher {
    providers: Vec<Box<dyn InferenceProvider>>,
}

impl Dispatcher {
    /// Create a dispatcher over the given providers
    ///
    /// Providers are ordered by tier; providers sharing a tier keep the
    /// order they were given in.
    pub fn new(mut providers: Vec<Box<dyn InferenceProvider>>) -> Self {
        providers.sort_by_key(|p| p.tier().rank());
        Self { providers }
    }

    /// Build the chain described by a gateway config
    ///
    /// The primary tier is always present. The self-hosted tier needs a
    /// secondary endpoint and the direct tier needs an endpoint; whether
    /// they are attempted is decided per dispatch.
    pub fn from_config(config: &GatewayConfig, client: Client) -> Self {
        let mut providers: Vec<Box<dyn InferenceProvider>> = vec![Box::new(
            PrimaryGatewayProvider::with_client(
                config.primary_endpoint.clone(),
                config.timeouts.primary(),
                client.clone(),
            ),
        )];

        if let Some(endpoint) = &config.secondary_endpoint {
            providers.push(Box::new(SelfHostedProvider::with_client(
                endpoint.clone(),
                config.model_name(),
                config.timeouts.self_hosted(),
                client.clone(),
            )));
        }

        if let Some(endpoint) = &config.direct.endpoint {
            providers.push(Box::new(DirectProvider::with_client(
                endpoint.clone(),
                config.direct.api_key(),
                config.timeouts.direct(),
                client,
            )));
        }

        Self::new(providers)
    }

    pub fn providers(&self) -> impl Iterator<Item = &dyn InferenceProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    /// Whether a tier may be attempted under the given config
    fn tier_enabled(tier: Tier, config: &GatewayConfig) -> bool {
        match tier {
            Tier::Primary => true,
            Tier::SelfHosted => config.ai_mode == AiMode::Live,
            Tier::Direct => config.ai_mode == AiMode::Live && config.direct.enabled,
        }
    }

    /// Walk the chain and return the first accepted answer
    ///
    /// Never fails. Cancelling `cancel` aborts the in-flight attempt and
    /// ends the walk with `Exhausted`.
    pub async fn dispatch(
        &self,
        prompt: &str,
        config: &GatewayConfig,
        cancel: &CancellationToken,
    ) -> DispatchOutcome {
        let dispatch_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", id = %dispatch_id, mode = %config.ai_mode);

        self.walk(prompt, config, cancel).instrument(span).await
    }

    async fn walk(
        &self,
        prompt: &str,
        config: &GatewayConfig,
        cancel: &CancellationToken,
    ) -> DispatchOutcome {
        let mut attempts = Vec::new();

        for provider in &self.providers {
            if !Self::tier_enabled(provider.tier(), config) {
                tracing::debug!("Skipping provider {} ({} mode)", provider.id(), config.ai_mode);
                continue;
            }

            if cancel.is_cancelled() {
                tracing::info!("Dispatch cancelled before {}", provider.id());
                break;
            }

            let timeout = provider.timeout();
            tracing::debug!(
                "Attempting provider: {} (timeout: {}s)",
                provider.id(),
                timeout.as_secs_f32()
            );

            let started_at = Utc::now();
            let clock = Instant::now();
            let attempt_token = cancel.child_token();

            let result = tokio::select! {
                _ = attempt_token.cancelled() => Err(ProviderError::Cancelled),
                result = tokio::time::timeout(timeout, provider.complete(prompt, timeout)) => {
                    result.unwrap_or(Err(ProviderError::Timeout(timeout)))
                }
            };

            let result = result.and_then(|text| match rejection_marker(&text) {
                Some(marker) => Err(ProviderError::RejectedAnswer(marker)),
                None => Ok(text),
            });

            let mut attempt = ProviderAttempt {
                provider_id: provider.id().to_string(),
                tier: provider.tier(),
                started_at,
                elapsed: clock.elapsed(),
                timeout,
                outcome: AttemptOutcome::Accepted,
            };

            match result {
                Ok(text) => {
                    tracing::info!(
                        "Provider {} succeeded in {}ms",
                        provider.id(),
                        attempt.elapsed.as_millis()
                    );
                    attempts.push(attempt);
                    return DispatchOutcome::Answered {
                        text,
                        provider_id: provider.id().to_string(),
                        attempts,
                    };
                }
                Err(ProviderError::Cancelled) => {
                    tracing::info!("Provider {} aborted by caller", provider.id());
                    attempt.outcome = AttemptOutcome::Failed(ProviderError::Cancelled);
                    attempts.push(attempt);
                    break;
                }
                Err(e) => {
                    tracing::warn!("Provider {} failed: {}", provider.id(), truncate(&e.to_string(), 200));
                    attempt.outcome = AttemptOutcome::Failed(e);
                    attempts.push(attempt);
                }
            }
        }

        tracing::warn!("All providers exhausted after {} attempt(s)", attempts.len());
        DispatchOutcome::Exhausted { attempts }
    }

    /// Probe every provider in the chain
    /// Returns a list of (provider_id, tier, is_healthy)
    pub async fn check_health(&self) -> Vec<(String, Tier, bool)> {
        let mut results = Vec::new();
        for provider in &self.providers {
            let is_healthy = provider.check_health().await;
            results.push((provider.id().to_string(), provider.tier(), is_healthy));
        }
        results
    }
}
