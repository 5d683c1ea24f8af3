//! Typed results returned by gateway capabilities
//!
//! Every constructor enforces the result's invariants (numeric domains and
//! list-length caps), so a value is valid whether it was extracted from a
//! live provider answer or produced by the fallback generator.

use serde::{Deserialize, Serialize};

use crate::types::QueryKind;

/// Maximum number of risk factors
pub const MAX_RISK_FACTORS: usize = 5;
/// Maximum number of competitors, investors, steps, grants and trends
pub const MAX_LIST_ITEMS: usize = 5;
/// Maximum entries per SWOT or market-entry section
pub const MAX_SECTION_ITEMS: usize = 5;
/// Maximum number of due-diligence questions
pub const MAX_QUESTIONS: usize = 3;
/// Maximum number of pitch-deck feedback points
pub const MAX_FEEDBACK_POINTS: usize = 7;

/// Trim every item, drop blanks, keep the first `max` in order
pub fn cap_list<I, S>(items: I, max: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(max)
        .collect()
}

/// Market risk score with its leading factors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0 is lowest risk, 100 highest
    pub score: u8,
    pub factors: Vec<String>,
}

impl RiskAssessment {
    pub fn new<I, S>(score: i64, factors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            score: score.clamp(0, 100) as u8,
            factors: cap_list(factors, MAX_RISK_FACTORS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorList {
    pub competitors: Vec<String>,
}

impl CompetitorList {
    pub fn new<I, S>(competitors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            competitors: cap_list(competitors, MAX_LIST_ITEMS),
        }
    }
}

/// Valuation bounds in whole currency units
///
/// Invariant: `0 < low_usd < high_usd`, both finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRange {
    pub low_usd: f64,
    pub high_usd: f64,
    pub currency: String,
}

impl ValuationRange {
    /// Returns `None` when the pair violates the ordering invariant
    pub fn new(low_usd: f64, high_usd: f64, currency: impl Into<String>) -> Option<Self> {
        let valid = low_usd.is_finite() && high_usd.is_finite() && low_usd > 0.0 && high_usd > low_usd;
        valid.then(|| Self {
            low_usd,
            high_usd,
            currency: currency.into(),
        })
    }

    pub fn usd(low_usd: f64, high_usd: f64) -> Option<Self> {
        Self::new(low_usd, high_usd, "USD")
    }
}

/// Due-diligence SWOT summary with follow-up questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotSummary {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
    pub questions: Vec<String>,
}

impl SwotSummary {
    pub fn new(
        strengths: Vec<String>,
        weaknesses: Vec<String>,
        opportunities: Vec<String>,
        threats: Vec<String>,
        questions: Vec<String>,
    ) -> Self {
        Self {
            strengths: cap_list(strengths, MAX_SECTION_ITEMS),
            weaknesses: cap_list(weaknesses, MAX_SECTION_ITEMS),
            opportunities: cap_list(opportunities, MAX_SECTION_ITEMS),
            threats: cap_list(threats, MAX_SECTION_ITEMS),
            questions: cap_list(questions, MAX_QUESTIONS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub topic: String,
    /// Signed percentage such as "+22%", or "n/a"
    pub change: String,
}

impl TrendEntry {
    pub fn new(topic: impl Into<String>, change: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            change: change.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendList {
    pub entries: Vec<TrendEntry>,
}

impl TrendList {
    pub fn new(entries: impl IntoIterator<Item = TrendEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .filter(|e| !e.topic.trim().is_empty())
                .take(MAX_LIST_ITEMS)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchDeckFeedback {
    pub feedback: Vec<String>,
}

impl PitchDeckFeedback {
    pub fn new<I, S>(feedback: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            feedback: cap_list(feedback, MAX_FEEDBACK_POINTS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundraisingSteps {
    pub steps: Vec<String>,
}

impl FundraisingSteps {
    pub fn new<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: cap_list(steps, MAX_LIST_ITEMS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeformAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl FreeformAnswer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEntryReport {
    pub opportunities: Vec<String>,
    pub challenges: Vec<String>,
}

impl MarketEntryReport {
    pub fn new(opportunities: Vec<String>, challenges: Vec<String>) -> Self {
        Self {
            opportunities: cap_list(opportunities, MAX_SECTION_ITEMS),
            challenges: cap_list(challenges, MAX_SECTION_ITEMS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactStatement {
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealsSummary {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSuggestions {
    pub grants: Vec<String>,
}

impl GrantSuggestions {
    pub fn new<I, S>(grants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            grants: cap_list(grants, MAX_LIST_ITEMS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorMatches {
    pub investors: Vec<String>,
}

impl InvestorMatches {
    pub fn new<I, S>(investors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            investors: cap_list(investors, MAX_LIST_ITEMS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroEmail {
    pub subject: Option<String>,
    pub body: String,
}

/// One variant per `QueryKind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionResult {
    RiskAssessment(RiskAssessment),
    CompetitorList(CompetitorList),
    ValuationRange(ValuationRange),
    DueDiligenceSummary(SwotSummary),
    TrendList(TrendList),
    PitchDeckFeedback(PitchDeckFeedback),
    FundraisingSteps(FundraisingSteps),
    FreeformAnswer(FreeformAnswer),
    MarketEntryReport(MarketEntryReport),
    ImpactStatement(ImpactStatement),
    DealsSummary(DealsSummary),
    GrantSuggestions(GrantSuggestions),
    InvestorMatches(InvestorMatches),
    IntroEmail(IntroEmail),
}

impl ExtractionResult {
    pub fn kind(&self) -> QueryKind {
        match self {
            ExtractionResult::RiskAssessment(_) => QueryKind::RiskAssessment,
            ExtractionResult::CompetitorList(_) => QueryKind::CompetitorList,
            ExtractionResult::ValuationRange(_) => QueryKind::ValuationRange,
            ExtractionResult::DueDiligenceSummary(_) => QueryKind::DueDiligenceSummary,
            ExtractionResult::TrendList(_) => QueryKind::TrendList,
            ExtractionResult::PitchDeckFeedback(_) => QueryKind::PitchDeckFeedback,
            ExtractionResult::FundraisingSteps(_) => QueryKind::FundraisingSteps,
            ExtractionResult::FreeformAnswer(_) => QueryKind::FreeformAnswer,
            ExtractionResult::MarketEntryReport(_) => QueryKind::MarketEntryReport,
            ExtractionResult::ImpactStatement(_) => QueryKind::ImpactStatement,
            ExtractionResult::DealsSummary(_) => QueryKind::DealsSummary,
            ExtractionResult::GrantSuggestions(_) => QueryKind::GrantSuggestions,
            ExtractionResult::InvestorMatches(_) => QueryKind::InvestorMatches,
            ExtractionResult::IntroEmail(_) => QueryKind::IntroEmail,
        }
    }
}

macro_rules! impl_into_extraction {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ExtractionResult {
                fn from(value: $ty) -> Self {
                    ExtractionResult::$variant(value)
                }
            }
        )*
    };
}

impl_into_extraction! {
    RiskAssessment => RiskAssessment,
    CompetitorList => CompetitorList,
    ValuationRange => ValuationRange,
    DueDiligenceSummary => SwotSummary,
    TrendList => TrendList,
    PitchDeckFeedback => PitchDeckFeedback,
    FundraisingSteps => FundraisingSteps,
    FreeformAnswer => FreeformAnswer,
    MarketEntryReport => MarketEntryReport,
    ImpactStatement => ImpactStatement,
    DealsSummary => DealsSummary,
    GrantSuggestions => GrantSuggestions,
    InvestorMatches => InvestorMatches,
    IntroEmail => IntroEmail,
}

/// Where a capability result came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Extracted from a live provider answer
    Live { provider: String },
    /// A provider answered but no extraction strategy matched
    Defaulted { provider: String },
    /// Every tier failed; canned answer
    Fallback,
}

impl Provenance {
    pub fn is_live(&self) -> bool {
        matches!(self, Provenance::Live { .. })
    }

    pub fn provider(&self) -> Option<&str> {
        match self {
            Provenance::Live { provider } | Provenance::Defaulted { provider } => Some(provider),
            Provenance::Fallback => None,
        }
    }
}

/// A capability result tagged with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayAnswer<T> {
    pub result: T,
    pub provenance: Provenance,
}

impl<T> GatewayAnswer<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GatewayAnswer<U> {
        GatewayAnswer {
            result: f(self.result),
            provenance: self.provenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_score_clamping() {
        assert_eq!(RiskAssessment::new(150, Vec::<String>::new()).score, 100);
        assert_eq!(RiskAssessment::new(-5, Vec::<String>::new()).score, 0);
        assert_eq!(RiskAssessment::new(62, vec!["a"]).score, 62);
    }

    #[test]
    fn test_risk_factors_capped_in_order() {
        let factors: Vec<String> = (1..=12).map(|i| format!("factor {i}")).collect();
        let risk = RiskAssessment::new(50, factors);
        assert_eq!(risk.factors.len(), 5);
        assert_eq!(risk.factors[0], "factor 1");
        assert_eq!(risk.factors[4], "factor 5");
    }

    #[test]
    fn test_cap_list_drops_blanks() {
        let items = cap_list(vec!["  a ", "", "   ", "b"], 5);
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn test_valuation_invariant() {
        assert!(ValuationRange::usd(3_000_000.0, 2_000_000.0).is_none());
        assert!(ValuationRange::usd(0.0, 2_000_000.0).is_none());
        assert!(ValuationRange::usd(2_000_000.0, 2_000_000.0).is_none());
        assert!(ValuationRange::usd(f64::NAN, 2.0).is_none());

        let range = ValuationRange::usd(2_000_000.0, 6_000_000.0).unwrap();
        assert_eq!(range.currency, "USD");
    }

    #[test]
    fn test_swot_caps() {
        let many: Vec<String> = (0..9).map(|i| format!("item {i}")).collect();
        let swot = SwotSummary::new(many.clone(), many.clone(), many.clone(), many.clone(), many);
        assert_eq!(swot.strengths.len(), 5);
        assert_eq!(swot.threats.len(), 5);
        assert_eq!(swot.questions.len(), 3);
    }

    #[test]
    fn test_extraction_result_kind_and_tag() {
        let result: ExtractionResult = RiskAssessment::new(10, vec!["x"]).into();
        assert_eq!(result.kind(), QueryKind::RiskAssessment);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "risk_assessment");
        assert_eq!(json["score"], 10);
    }

    #[test]
    fn test_provenance_accessors() {
        let live = Provenance::Live {
            provider: "primary".to_string(),
        };
        assert!(live.is_live());
        assert_eq!(live.provider(), Some("primary"));
        assert_eq!(Provenance::Fallback.provider(), None);
    }

    #[test]
    fn test_gateway_answer_map() {
        let answer = GatewayAnswer {
            result: 2,
            provenance: Provenance::Fallback,
        };
        let mapped = answer.map(|n| n * 10);
        assert_eq!(mapped.result, 20);
        assert_eq!(mapped.provenance, Provenance::Fallback);
    }
}
