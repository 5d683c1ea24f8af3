//! Query types
//!
//! A `Query` is created per capability call and never persisted. Its fields
//! are private so a query cannot be modified once the dispatcher holds it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Business question categories answered by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    RiskAssessment,
    CompetitorList,
    ValuationRange,
    DueDiligenceSummary,
    TrendList,
    PitchDeckFeedback,
    FundraisingSteps,
    FreeformAnswer,
    MarketEntryReport,
    ImpactStatement,
    DealsSummary,
    GrantSuggestions,
    InvestorMatches,
    IntroEmail,
}

impl QueryKind {
    /// Every kind, in declaration order
    pub const ALL: [QueryKind; 14] = [
        QueryKind::RiskAssessment,
        QueryKind::CompetitorList,
        QueryKind::ValuationRange,
        QueryKind::DueDiligenceSummary,
        QueryKind::TrendList,
        QueryKind::PitchDeckFeedback,
        QueryKind::FundraisingSteps,
        QueryKind::FreeformAnswer,
        QueryKind::MarketEntryReport,
        QueryKind::ImpactStatement,
        QueryKind::DealsSummary,
        QueryKind::GrantSuggestions,
        QueryKind::InvestorMatches,
        QueryKind::IntroEmail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::RiskAssessment => "risk_assessment",
            QueryKind::CompetitorList => "competitor_list",
            QueryKind::ValuationRange => "valuation_range",
            QueryKind::DueDiligenceSummary => "due_diligence_summary",
            QueryKind::TrendList => "trend_list",
            QueryKind::PitchDeckFeedback => "pitch_deck_feedback",
            QueryKind::FundraisingSteps => "fundraising_steps",
            QueryKind::FreeformAnswer => "freeform_answer",
            QueryKind::MarketEntryReport => "market_entry_report",
            QueryKind::ImpactStatement => "impact_statement",
            QueryKind::DealsSummary => "deals_summary",
            QueryKind::GrantSuggestions => "grant_suggestions",
            QueryKind::InvestorMatches => "investor_matches",
            QueryKind::IntroEmail => "intro_email",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single business question bound for the provider chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    kind: QueryKind,
    prompt_text: String,
    params: BTreeMap<String, serde_json::Value>,
}

impl Query {
    /// Create a new query with no parameters
    pub fn new(kind: QueryKind, prompt_text: impl Into<String>) -> Self {
        Self {
            kind,
            prompt_text: prompt_text.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Add a string parameter if it is present and not blank
    pub fn with_opt_str(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.with_param(key, serde_json::Value::String(v.to_string())),
            None => self,
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn params(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.params
    }

    /// Get a string parameter, ignoring blank values
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Get a string parameter or a default
    pub fn param_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.param_str(key).unwrap_or(default)
    }

    /// Get a numeric parameter
    pub fn param_f64(&self, key: &str) -> Option<f64> {
        self.params.get(key).and_then(|v| v.as_f64())
    }
}
