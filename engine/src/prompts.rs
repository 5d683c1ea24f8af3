//! Prompt templates
//!
//! One typed input per capability. `to_query` renders the fixed prompt for
//! its kind and records the inputs as query parameters so the fallback
//! generator can personalize its canned answer.

use sdk::{Query, QueryKind};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Query parameter names shared with the fallback generator
pub mod keys {
    pub const COUNTRY: &str = "country";
    pub const COMPANY: &str = "company";
    pub const COMPANY_ID: &str = "company_id";
    pub const SECTOR: &str = "sector";
    pub const STAGE: &str = "stage";
    pub const AMOUNT: &str = "amount";
    pub const TIMEFRAME: &str = "timeframe";
    pub const DECK_SUMMARY: &str = "deck_summary";
    pub const QUESTION: &str = "question";
    pub const USERS: &str = "users";
    pub const CONDITION: &str = "condition";
    pub const GRANT_TYPE: &str = "grant_type";
    pub const INVESTOR: &str = "investor";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskInput {
    pub country: String,
    #[serde(default)]
    pub company_id: Option<String>,
}

impl RiskInput {
    pub fn to_query(&self) -> Query {
        let prompt = format!(
            "Assess market risk for healthcare companies in {}. Provide:\n\
             1. Risk score (0-100, where 0 is lowest risk and 100 is highest risk)\n\
             2. Top 5 key risk factors\n\
             \n\
             Format your response as:\n\
             RISK SCORE: [number]\n\
             RISK FACTORS:\n\
             - [Factor 1]\n\
             - [Factor 2]\n\
             - [Factor 3]\n\
             - [Factor 4]\n\
             - [Factor 5]",
            self.country
        );
        Query::new(QueryKind::RiskAssessment, prompt)
            .with_opt_str(keys::COUNTRY, Some(self.country.as_str()))
            .with_opt_str(keys::COMPANY_ID, self.company_id.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorInput {
    pub company: String,
}

impl CompetitorInput {
    pub fn to_query(&self) -> Query {
        let prompt = format!(
            "List top 5 competitors for {} in the African healthcare market. \
             Provide company names only, one per line, without numbering or bullets.",
            self.company
        );
        Query::new(QueryKind::CompetitorList, prompt)
            .with_opt_str(keys::COMPANY, Some(self.company.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationInput {
    pub sector: String,
    pub stage: String,
}

impl ValuationInput {
    pub fn to_query(&self) -> Query {
        let prompt = format!(
            "What is the typical valuation range for a {} stage {} healthcare startup in Africa?\n\
             \n\
             Provide the valuation range in USD millions. Format your response as:\n\
             VALUATION RANGE: $X - $Y million USD\n\
             or\n\
             VALUATION: $X to $Y million",
            self.stage, self.sector
        );
        Query::new(QueryKind::ValuationRange, prompt)
            .with_opt_str(keys::SECTOR, Some(self.sector.as_str()))
            .with_opt_str(keys::STAGE, Some(self.stage.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueDiligenceInput {
    pub company: String,
}

impl DueDiligenceInput {
    pub fn to_query(&self) -> Query {
        let prompt = format!(
            "Provide a comprehensive due diligence summary for {} in African healthcare. \
             Format your response as follows:\n\
             \n\
             STRENGTHS:\n\
             - [List 2-3 strengths, one per line]\n\
             \n\
             WEAKNESSES:\n\
             - [List 2-3 weaknesses, one per line]\n\
             \n\
             OPPORTUNITIES:\n\
             - [List 2-3 opportunities, one per line]\n\
             \n\
             THREATS:\n\
             - [List 2-3 threats, one per line]\n\
             \n\
             KEY QUESTIONS:\n\
             1. [First question]\n\
             2. [Second question]\n\
             3. [Third question]",
            self.company
        );
        Query::new(QueryKind::DueDiligenceSummary, prompt)
            .with_opt_str(keys::COMPANY, Some(self.company.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendInput {
    pub timeframe: String,
}

impl TrendInput {
    pub fn to_query(&self) -> Query {
        let prompt = format!(
            "Identify emerging healthcare trends in Africa for {}. For each trend, provide:\n\
             1. Trend name\n\
             2. Brief description\n\
             3. Growth indicator if available\n\
             \n\
             Format: One trend per line with name and description.",
            self.timeframe
        );
        Query::new(QueryKind::TrendList, prompt)
            .with_opt_str(keys::TIMEFRAME, Some(self.timeframe.as_str()))
    }
}

/// Pitch deck review; the deck's extracted text is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitchDeckInput {
    #[serde(default)]
    pub deck_summary: Option<String>,
}

impl PitchDeckInput {
    pub fn to_query(&self) -> Query {
        let mut prompt = String::from(
            "Analyze a pitch deck for a healthcare startup. Provide feedback on:\n\
             1. Content quality and clarity\n\
             2. Structure and flow\n\
             3. Financial projections\n\
             4. Market opportunity presentation\n\
             5. Competitive positioning\n\
             \n\
             Provide 5-7 specific, actionable feedback points.",
        );
        if let Some(summary) = self.deck_summary.as_deref().filter(|s| !s.trim().is_empty()) {
            prompt.push_str("\n\nDeck contents:\n");
            prompt.push_str(summary.trim());
        }
        Query::new(QueryKind::PitchDeckFeedback, prompt)
            .with_opt_str(keys::DECK_SUMMARY, self.deck_summary.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundraisingInput {
    pub sector: String,
    pub stage: String,
    /// Target raise in USD
    pub amount: f64,
}

impl FundraisingInput {
    pub fn to_query(&self) -> Query {
        let prompt = format!(
            "Create a fundraising strategy for a {} company at {} stage raising ${} in Africa. \
             Provide 5 actionable steps.",
            self.sector,
            self.stage,
            group_thousands(self.amount)
        );
        Query::new(QueryKind::FundraisingSteps, prompt)
            .with_opt_str(keys::SECTOR, Some(self.sector.as_str()))
            .with_opt_str(keys::STAGE, Some(self.stage.as_str()))
            .with_param(keys::AMOUNT, json!(self.amount))
    }
}

/// Free-form questions are sent verbatim
pub fn freeform_query(question: &str) -> Query {
    Query::new(QueryKind::FreeformAnswer, question.trim())
        .with_opt_str(keys::QUESTION, Some(question))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEntryInput {
    pub country: String,
    pub sector: String,
}

impl MarketEntryInput {
    pub fn to_query(&self) -> Query {
        let prompt = format!(
            "Create a comprehensive market entry report for {} in {}. Format your response as:\n\
             \n\
             OPPORTUNITIES:\n\
             - [List 3-5 opportunities, one per line]\n\
             \n\
             CHALLENGES:\n\
             - [List 3-5 challenges, one per line]",
            self.sector, self.country
        );
        Query::new(QueryKind::MarketEntryReport, prompt)
            .with_opt_str(keys::COUNTRY, Some(self.country.as_str()))
            .with_opt_str(keys::SECTOR, Some(self.sector.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactInput {
    pub users: u64,
    pub condition: String,
}

impl ImpactInput {
    pub fn to_query(&self) -> Query {
        let prompt = format!(
            "Generate an impact statement for a healthcare solution serving {} users with focus on {} in Africa. \
             Include key metrics and outcomes.",
            group_thousands(self.users as f64),
            self.condition
        );
        Query::new(QueryKind::ImpactStatement, prompt)
            .with_param(keys::USERS, json!(self.users))
            .with_opt_str(keys::CONDITION, Some(self.condition.as_str()))
    }
}

/// Optional sector / stage / country filters shared by deal and investor queries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealFilters {
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl DealFilters {
    fn apply(&self, query: Query) -> Query {
        query
            .with_opt_str(keys::SECTOR, self.sector.as_deref())
            .with_opt_str(keys::STAGE, self.stage.as_deref())
            .with_opt_str(keys::COUNTRY, self.country.as_deref())
    }

    /// Deals prompt
    pub fn to_deals_query(&self) -> Query {
        let parts: Vec<String> = [
            present(&self.sector).map(|s| format!("in {} sector", s)),
            present(&self.stage).map(|s| format!("at {} stage", s)),
            present(&self.country).map(|c| format!("in {}", c)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let scope = if parts.is_empty() {
            "in Africa".to_string()
        } else {
            parts.join(" ")
        };

        let prompt = format!(
            "Summarize recent healthcare investment deals {}.\n\
             \n\
             Provide:\n\
             1. 3-5 key points about recent deals\n\
             2. A key takeaway or trend\n\
             \n\
             Format as a clear, concise summary.",
            scope
        );
        self.apply(Query::new(QueryKind::DealsSummary, prompt))
    }

    /// Investor matching prompt
    pub fn to_investor_query(&self) -> Query {
        let prompt = format!(
            "List 5 investors that match these criteria:\n\
             - Sector: {}\n\
             - Stage: {}\n\
             - Geographic focus: {}\n\
             \n\
             Provide investor names only, one per line, without numbering or bullets.",
            present(&self.sector).unwrap_or("healthcare"),
            present(&self.stage).unwrap_or("seed"),
            present(&self.country).unwrap_or("Africa")
        );
        self.apply(Query::new(QueryKind::InvestorMatches, prompt))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrantFilters {
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub grant_type: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl GrantFilters {
    pub fn to_query(&self) -> Query {
        let prompt = format!(
            "Suggest 5 grant opportunities for {} companies in {} ({}).\n\
             \n\
             For each grant, provide:\n\
             1. Grant name\n\
             2. Brief description (1-2 sentences)\n\
             \n\
             Format: One grant per line with name and description.",
            present(&self.sector).unwrap_or("health tech"),
            present(&self.country).unwrap_or("Africa"),
            present(&self.grant_type).unwrap_or("any type")
        );
        Query::new(QueryKind::GrantSuggestions, prompt)
            .with_opt_str(keys::SECTOR, self.sector.as_deref())
            .with_opt_str(keys::GRANT_TYPE, self.grant_type.as_deref())
            .with_opt_str(keys::COUNTRY, self.country.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroEmailInput {
    pub investor: String,
    pub company: String,
    pub sector: String,
    pub stage: String,
}

impl IntroEmailInput {
    pub fn to_query(&self) -> Query {
        let prompt = format!(
            "Draft a professional introduction email from {} ({} sector, {} stage) to {}.\n\
             \n\
             Requirements:\n\
             - Professional but warm tone\n\
             - Approximately 120-150 words\n\
             - Include: company introduction, what we do, traction, why we're reaching out\n\
             - Clear call to action\n\
             - Professional closing\n\
             \n\
             Format as a complete email with subject line.",
            self.company, self.sector, self.stage, self.investor
        );
        Query::new(QueryKind::IntroEmail, prompt)
            .with_opt_str(keys::INVESTOR, Some(self.investor.as_str()))
            .with_opt_str(keys::COMPANY, Some(self.company.as_str()))
            .with_opt_str(keys::SECTOR, Some(self.sector.as_str()))
            .with_opt_str(keys::STAGE, Some(self.stage.as_str()))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Format a whole amount with comma thousands separators, e.g. 1,500,000
pub fn group_thousands(amount: f64) -> String {
    let whole = amount.max(0.0).round() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1500000.0), "1,500,000");
        assert_eq!(group_thousands(12345.6), "12,346");
    }

    #[test]
    fn test_risk_prompt_and_params() {
        let query = RiskInput {
            country: "Kenya".to_string(),
            company_id: None,
        }
        .to_query();

        assert_eq!(query.kind(), QueryKind::RiskAssessment);
        assert!(query.prompt_text().contains("healthcare companies in Kenya"));
        assert!(query.prompt_text().contains("RISK SCORE: [number]"));
        assert_eq!(query.param_str(keys::COUNTRY), Some("Kenya"));
        assert_eq!(query.param_str(keys::COMPANY_ID), None);
    }

    #[test]
    fn test_deal_filters_scope() {
        let filters = DealFilters {
            sector: Some("Diagnostics".to_string()),
            stage: None,
            country: Some("Ghana".to_string()),
        };
        let query = filters.to_deals_query();
        assert!(query
            .prompt_text()
            .contains("deals in Diagnostics sector in Ghana."));
        assert_eq!(query.param_str(keys::STAGE), None);

        let query = DealFilters::default().to_deals_query();
        assert!(query.prompt_text().contains("deals in Africa."));
    }

    #[test]
    fn test_investor_prompt_defaults() {
        let query = DealFilters::default().to_investor_query();
        assert!(query.prompt_text().contains("- Stage: seed"));
        assert!(query.prompt_text().contains("- Geographic focus: Africa"));
    }

    #[test]
    fn test_fundraising_amount_param() {
        let query = FundraisingInput {
            sector: "Diagnostics".to_string(),
            stage: "Seed".to_string(),
            amount: 1_500_000.0,
        }
        .to_query();
        assert!(query.prompt_text().contains("raising $1,500,000 in Africa"));
        assert_eq!(query.param_f64(keys::AMOUNT), Some(1_500_000.0));
    }

    #[test]
    fn test_pitch_deck_summary_appended() {
        let query = PitchDeckInput {
            deck_summary: Some("Slide 1: Problem".to_string()),
        }
        .to_query();
        assert!(query.prompt_text().ends_with("Deck contents:\nSlide 1: Problem"));
    }
}
