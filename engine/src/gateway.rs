//! AI Query Gateway
//!
//! The public capability surface. Each capability renders its prompt, walks
//! the provider chain once, extracts a typed result from the accepted
//! answer and falls back to a canned result when the chain is exhausted.
//! Capabilities never return an error; the provenance tag on the answer
//! tells live results apart from defaulted and canned ones.

use reqwest::Client;
use sdk::{
    CompetitorList, DealsSummary, ExtractionResult, FreeformAnswer, FundraisingSteps,
    GatewayAnswer, GrantSuggestions, ImpactStatement, IntroEmail, InvestorMatches,
    MarketEntryReport, PitchDeckFeedback, Provenance, Query, RiskAssessment, SwotSummary,
    TrendList, ValuationRange,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigSource, GatewayConfig};
use crate::extract::{self, lists, risk, sections, text, trends, valuation};
use crate::fallback::{
    self, DEFAULT_COMPANY, DEFAULT_CONDITION, DEFAULT_COUNTRY, DEFAULT_INVESTOR, DEFAULT_SECTOR,
    DEFAULT_STAGE,
};
use crate::llm::dispatcher::{DispatchOutcome, Dispatcher};
use crate::llm::Tier;
use crate::prompts::{
    self, keys, CompetitorInput, DealFilters, DueDiligenceInput, FundraisingInput, GrantFilters,
    ImpactInput, IntroEmailInput, MarketEntryInput, PitchDeckInput, RiskInput, TrendInput,
    ValuationInput,
};

/// Where the provider chain comes from
enum ProviderChain {
    /// Rebuilt from the loaded config on every call
    FromConfig(Client),
    /// Fixed chain, config only decides which tiers run
    Fixed(Dispatcher),
}

pub struct Gateway {
    chain: ProviderChain,
    config_source: Arc<dyn ConfigSource>,
}

impl Gateway {
    /// Gateway whose providers follow the configured endpoints
    pub fn new(config_source: Arc<dyn ConfigSource>) -> Self {
        Self {
            chain: ProviderChain::FromConfig(Client::new()),
            config_source,
        }
    }

    /// Gateway over a prebuilt provider chain
    pub fn with_dispatcher(dispatcher: Dispatcher, config_source: Arc<dyn ConfigSource>) -> Self {
        Self {
            chain: ProviderChain::Fixed(dispatcher),
            config_source,
        }
    }

    /// Current config, or the defaults if the source cannot be read
    pub fn load_config(&self) -> GatewayConfig {
        match self.config_source.load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load gateway config, using defaults: {}", e);
                GatewayConfig::default()
            }
        }
    }

    async fn dispatch(&self, prompt: &str, cancel: &CancellationToken) -> DispatchOutcome {
        let config = self.load_config();
        match &self.chain {
            ProviderChain::Fixed(dispatcher) => dispatcher.dispatch(prompt, &config, cancel).await,
            ProviderChain::FromConfig(client) => {
                Dispatcher::from_config(&config, client.clone())
                    .dispatch(prompt, &config, cancel)
                    .await
            }
        }
    }

    /// Dispatch one query and turn the outcome into a tagged answer
    async fn resolve<T>(
        &self,
        query: Query,
        cancel: &CancellationToken,
        extract: impl FnOnce(&str) -> Option<T>,
        fallback: impl FnOnce(&Query) -> T,
    ) -> GatewayAnswer<T> {
        let kind = query.kind();
        tracing::debug!("Resolving {} query", kind);

        match self.dispatch(query.prompt_text(), cancel).await {
            DispatchOutcome::Answered {
                text, provider_id, ..
            } => match extract(&text) {
                Some(result) => GatewayAnswer {
                    result,
                    provenance: Provenance::Live {
                        provider: provider_id,
                    },
                },
                None => {
                    tracing::info!(
                        "No {} found in answer from {}, using default",
                        kind,
                        provider_id
                    );
                    GatewayAnswer {
                        result: fallback(&query),
                        provenance: Provenance::Defaulted {
                            provider: provider_id,
                        },
                    }
                }
            },
            DispatchOutcome::Exhausted { .. } => {
                tracing::info!("Serving fallback {}", kind);
                GatewayAnswer {
                    result: fallback(&query),
                    provenance: Provenance::Fallback,
                }
            }
        }
    }

    /// Answer any query, routing by its kind
    pub async fn run(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<ExtractionResult> {
        let kind = query.kind();
        self.resolve(
            query.clone(),
            cancel,
            |text| extract::extract(kind, text),
            fallback::generate,
        )
        .await
    }

    pub async fn risk_assessment(
        &self,
        input: &RiskInput,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<RiskAssessment> {
        self.resolve(input.to_query(), cancel, risk::extract, |query| {
            fallback::risk_assessment(query.param_str_or(keys::COUNTRY, DEFAULT_COUNTRY))
        })
        .await
    }

    pub async fn competitors(
        &self,
        input: &CompetitorInput,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<CompetitorList> {
        self.resolve(input.to_query(), cancel, lists::competitors, |query| {
            fallback::competitors(query.param_str_or(keys::COMPANY, DEFAULT_COMPANY))
        })
        .await
    }

    pub async fn valuation(
        &self,
        input: &ValuationInput,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<ValuationRange> {
        self.resolve(input.to_query(), cancel, valuation::extract, |query| {
            fallback::valuation(query.param_str_or(keys::STAGE, DEFAULT_STAGE))
        })
        .await
    }

    pub async fn due_diligence(
        &self,
        input: &DueDiligenceInput,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<SwotSummary> {
        self.resolve(input.to_query(), cancel, sections::due_diligence, |query| {
            fallback::due_diligence(query.param_str_or(keys::COMPANY, DEFAULT_COMPANY))
        })
        .await
    }

    pub async fn trends(
        &self,
        input: &TrendInput,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<TrendList> {
        self.resolve(input.to_query(), cancel, trends::extract, |_| fallback::trends())
            .await
    }

    pub async fn pitch_feedback(
        &self,
        input: &PitchDeckInput,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<PitchDeckFeedback> {
        self.resolve(input.to_query(), cancel, lists::pitch_feedback, |_| {
            fallback::pitch_feedback()
        })
        .await
    }

    pub async fn fundraising(
        &self,
        input: &FundraisingInput,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<FundraisingSteps> {
        self.resolve(input.to_query(), cancel, lists::fundraising_steps, |query| {
            fallback::fundraising_steps(
                query.param_str_or(keys::SECTOR, DEFAULT_SECTOR),
                query.param_str_or(keys::STAGE, DEFAULT_STAGE),
            )
        })
        .await
    }

    /// Answer a free-form question. A blank question never reaches the providers.
    pub async fn ask(
        &self,
        question: &str,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<FreeformAnswer> {
        if question.trim().is_empty() {
            return GatewayAnswer {
                result: fallback::freeform(question),
                provenance: Provenance::Fallback,
            };
        }

        self.resolve(prompts::freeform_query(question), cancel, text::freeform, |_| {
            fallback::freeform(question)
        })
        .await
    }

    pub async fn market_entry(
        &self,
        input: &MarketEntryInput,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<MarketEntryReport> {
        self.resolve(input.to_query(), cancel, sections::market_entry, |query| {
            fallback::market_entry(
                query.param_str_or(keys::COUNTRY, DEFAULT_COUNTRY),
                query.param_str_or(keys::SECTOR, DEFAULT_SECTOR),
            )
        })
        .await
    }

    pub async fn impact(
        &self,
        input: &ImpactInput,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<ImpactStatement> {
        self.resolve(input.to_query(), cancel, text::impact, |query| {
            fallback::impact(
                input.users as f64,
                query.param_str_or(keys::CONDITION, DEFAULT_CONDITION),
            )
        })
        .await
    }

    pub async fn deals(
        &self,
        filters: &DealFilters,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<DealsSummary> {
        self.resolve(filters.to_deals_query(), cancel, text::deals, |query| {
            fallback::deals(
                query.param_str(keys::SECTOR),
                query.param_str(keys::STAGE),
                query.param_str(keys::COUNTRY),
            )
        })
        .await
    }

    pub async fn grants(
        &self,
        filters: &GrantFilters,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<GrantSuggestions> {
        self.resolve(filters.to_query(), cancel, lists::grants, |query| {
            fallback::grants(
                query.param_str(keys::SECTOR),
                query.param_str(keys::GRANT_TYPE),
                query.param_str(keys::COUNTRY),
            )
        })
        .await
    }

    pub async fn investors(
        &self,
        filters: &DealFilters,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<InvestorMatches> {
        self.resolve(filters.to_investor_query(), cancel, lists::investors, |query| {
            fallback::investors(query.param_str(keys::STAGE))
        })
        .await
    }

    pub async fn intro_email(
        &self,
        input: &IntroEmailInput,
        cancel: &CancellationToken,
    ) -> GatewayAnswer<IntroEmail> {
        self.resolve(input.to_query(), cancel, text::intro_email, |query| {
            fallback::intro_email(
                query.param_str_or(keys::INVESTOR, DEFAULT_INVESTOR),
                query.param_str_or(keys::COMPANY, DEFAULT_COMPANY),
                query.param_str_or(keys::SECTOR, DEFAULT_SECTOR),
                query.param_str_or(keys::STAGE, DEFAULT_STAGE),
            )
        })
        .await
    }

    /// Probe every provider the current config describes
    pub async fn check_health(&self) -> Vec<(String, Tier, bool)> {
        match &self.chain {
            ProviderChain::Fixed(dispatcher) => dispatcher.check_health().await,
            ProviderChain::FromConfig(client) => {
                let config = self.load_config();
                Dispatcher::from_config(&config, client.clone())
                    .check_health()
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfigSource;
    use crate::llm::{InferenceProvider, ProviderError};
    use async_trait::async_trait;
    use sdk::QueryKind;
    use std::time::Duration;

    struct CannedProvider {
        answer: Option<&'static str>,
    }

    #[async_trait]
    impl InferenceProvider for CannedProvider {
        fn id(&self) -> &str {
            "canned"
        }

        fn tier(&self) -> Tier {
            Tier::Primary
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(100)
        }

        async fn complete(&self, _prompt: &str, _timeout: Duration) -> crate::llm::Result<String> {
            self.answer
                .map(str::to_string)
                .ok_or(ProviderError::UpstreamUnavailable)
        }
    }

    fn gateway(answer: Option<&'static str>) -> Gateway {
        Gateway::with_dispatcher(
            Dispatcher::new(vec![Box::new(CannedProvider { answer })]),
            Arc::new(StaticConfigSource::default()),
        )
    }

    #[tokio::test]
    async fn test_live_answer_is_extracted() {
        let gateway = gateway(Some(
            "RISK SCORE: 62\nRISK FACTORS:\n- Regulatory complexity\n- FX volatility",
        ));
        let input = RiskInput {
            country: "Kenya".to_string(),
            company_id: None,
        };

        let answer = gateway
            .risk_assessment(&input, &CancellationToken::new())
            .await;
        assert_eq!(answer.result.score, 62);
        assert_eq!(
            answer.result.factors,
            vec!["Regulatory complexity", "FX volatility"]
        );
        assert_eq!(answer.provenance.provider(), Some("canned"));
        assert!(answer.provenance.is_live());
    }

    #[tokio::test]
    async fn test_unusable_answer_is_defaulted() {
        let gateway = gateway(Some("I cannot help with that."));
        let input = ImpactInput {
            users: 1000,
            condition: "diabetes".to_string(),
        };

        let answer = gateway.impact(&input, &CancellationToken::new()).await;
        assert!(answer.result.statement.starts_with("Estimated 350"));
        assert_eq!(
            answer.provenance,
            Provenance::Defaulted {
                provider: "canned".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_exhausted_chain_serves_fallback() {
        let gateway = gateway(None);
        let input = ValuationInput {
            sector: "Diagnostics".to_string(),
            stage: "Series A".to_string(),
        };

        let answer = gateway.valuation(&input, &CancellationToken::new()).await;
        assert_eq!(answer.provenance, Provenance::Fallback);
        assert_eq!(answer.result.low_usd, 5_000_000.0);
        assert_eq!(answer.result.high_usd, 12_000_000.0);
    }

    #[tokio::test]
    async fn test_run_routes_by_kind() {
        let gateway = gateway(None);
        let query = DealFilters {
            stage: Some("Seed".to_string()),
            ..Default::default()
        }
        .to_investor_query();

        let answer = gateway.run(&query, &CancellationToken::new()).await;
        assert_eq!(answer.result.kind(), QueryKind::InvestorMatches);
        assert_eq!(answer.provenance, Provenance::Fallback);
    }

    #[tokio::test]
    async fn test_blank_inputs_use_default_names() {
        let gateway = gateway(None);
        let cancel = CancellationToken::new();

        let risk = RiskInput {
            country: "   ".to_string(),
            company_id: None,
        };
        let answer = gateway.risk_assessment(&risk, &cancel).await;
        assert_eq!(answer.result.score, 62);

        let rivals = CompetitorInput {
            company: String::new(),
        };
        let answer = gateway.competitors(&rivals, &cancel).await;
        assert_eq!(answer.result.competitors[0], "TargetCo Labs");

        let email = IntroEmailInput {
            investor: " ".to_string(),
            company: "Afya Labs".to_string(),
            sector: String::new(),
            stage: "Series A".to_string(),
        };
        let answer = gateway.intro_email(&email, &cancel).await;
        assert_eq!(
            answer.result.subject.as_deref(),
            Some("Afya Labs - Series A Stage healthcare Opportunity")
        );
        assert!(answer.result.body.starts_with("Hi there,"));
    }

    #[tokio::test]
    async fn test_blank_question_skips_providers() {
        let gateway = gateway(Some("A perfectly good answer about healthcare markets."));

        let answer = gateway.ask("  \n ", &CancellationToken::new()).await;
        assert_eq!(answer.provenance, Provenance::Fallback);
        assert!(answer.result.answer.ends_with("Your question: "));

        let answer = gateway
            .ask("Which markets are growing?", &CancellationToken::new())
            .await;
        assert!(answer.provenance.is_live());
    }

    #[tokio::test]
    async fn test_bad_config_source_uses_defaults() {
        struct Broken;
        impl ConfigSource for Broken {
            fn load(&self) -> Result<GatewayConfig, sdk::GatewayError> {
                Err(sdk::GatewayError::Config("unreadable".to_string()))
            }
        }

        let gateway = Gateway::with_dispatcher(Dispatcher::new(Vec::new()), Arc::new(Broken));
        assert_eq!(gateway.load_config().ai_mode, crate::config::AiMode::Demo);

        let answer = gateway.ask("Hello?", &CancellationToken::new()).await;
        assert_eq!(answer.provenance, Provenance::Fallback);
        assert!(answer.result.answer.ends_with("Your question: Hello?"));
    }
}
