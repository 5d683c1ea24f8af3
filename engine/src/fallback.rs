//! Fallback Generator
//!
//! Canned, network-free answers used when every provider tier fails. Each
//! kind has one template personalized with the caller's inputs so the
//! result still reads as relevant. Outputs go through the same result
//! constructors as live answers and satisfy the same invariants.

use sdk::{
    CompetitorList, DealsSummary, ExtractionResult, FreeformAnswer, FundraisingSteps,
    GrantSuggestions, ImpactStatement, IntroEmail, InvestorMatches, MarketEntryReport,
    PitchDeckFeedback, Query, QueryKind, RiskAssessment, SwotSummary, TrendEntry, TrendList,
    ValuationRange,
};

use crate::prompts::keys;

/// Risk score for countries without a baseline
pub const DEFAULT_COUNTRY_BASELINE: i64 = 60;

/// Stand-ins for blank or missing query inputs
pub const DEFAULT_COUNTRY: &str = "Kenya";
pub const DEFAULT_COMPANY: &str = "TargetCo";
pub const DEFAULT_SECTOR: &str = "healthcare";
pub const DEFAULT_STAGE: &str = "Seed";
pub const DEFAULT_CONDITION: &str = "chronic conditions";
pub const DEFAULT_INVESTOR: &str = "there";

/// Baseline risk by country, keyed without whitespace
const COUNTRY_BASELINES: &[(&str, i64)] = &[
    ("kenya", 62),
    ("nigeria", 68),
    ("ghana", 58),
    ("rwanda", 52),
    ("egypt", 61),
    ("southafrica", 55),
    ("tanzania", 64),
    ("uganda", 66),
    ("ethiopia", 70),
];

const RISK_FACTORS: [&str; 5] = [
    "Regulatory environment and approvals complexity",
    "Macroeconomic stability and foreign exchange volatility",
    "Healthcare infrastructure and distribution challenges",
    "Competitive intensity and substitute products",
    "Reimbursement systems and purchasing power limitations",
];

/// (stage, low, high) in USD
const STAGE_VALUATIONS: &[(&str, f64, f64)] = &[
    ("pre-seed", 1_500_000.0, 3_000_000.0),
    ("seed", 2_000_000.0, 6_000_000.0),
    ("series a", 5_000_000.0, 12_000_000.0),
    ("series b", 15_000_000.0, 30_000_000.0),
    ("series c+", 30_000_000.0, 80_000_000.0),
];

const TRENDS: [(&str, &str); 5] = [
    ("Telemedicine uptake (East Africa)", "+22%"),
    ("AI diagnostics in primary care", "+18%"),
    ("Last-mile cold chain optimization", "+12%"),
    ("Mobile health (mHealth) solutions expansion", "+15%"),
    ("Digital health record adoption", "+10%"),
];

const PITCH_FEEDBACK: [&str; 7] = [
    "Clarify go-to-market strategy by segment with specific customer acquisition plans",
    "Add unit economics sensitivity table showing best/worst case scenarios",
    "Strengthen competitive positioning with clear differentiation",
    "Include detailed financial projections with key assumptions",
    "Enhance market opportunity section with TAM/SAM/SOM analysis",
    "Add traction metrics and milestones achieved",
    "Improve team slide with relevant healthcare industry experience",
];

const ENTRY_CHALLENGES: [&str; 5] = [
    "Fragmented reimbursement and procurement systems",
    "Logistics and distribution complexity",
    "Variability in clinical adoption and training needs",
    "Regulatory approval processes",
    "Limited healthcare infrastructure in rural areas",
];

const SEED_INVESTORS: [&str; 5] = [
    "Launch Africa",
    "Future Africa",
    "Savannah Capital",
    "TLcom Capital",
    "Microtraction",
];

const SERIES_A_INVESTORS: [&str; 5] = [
    "Savannah Capital",
    "TLcom Capital",
    "Partech Africa",
    "Norfund Health",
    "IFC",
];

const GENERAL_INVESTORS: [&str; 5] = [
    "Savannah Capital",
    "TLcom Capital",
    "Launch Africa",
    "Norfund Health",
    "Partech Africa",
];

/// Canned result for any query, personalized from its parameters
pub fn generate(query: &Query) -> ExtractionResult {
    let str_param = |key: &str| query.param_str(key);

    match query.kind() {
        QueryKind::RiskAssessment => {
            risk_assessment(query.param_str_or(keys::COUNTRY, DEFAULT_COUNTRY)).into()
        }
        QueryKind::CompetitorList => {
            competitors(query.param_str_or(keys::COMPANY, DEFAULT_COMPANY)).into()
        }
        QueryKind::ValuationRange => {
            valuation(query.param_str_or(keys::STAGE, DEFAULT_STAGE)).into()
        }
        QueryKind::DueDiligenceSummary => {
            due_diligence(query.param_str_or(keys::COMPANY, DEFAULT_COMPANY)).into()
        }
        QueryKind::TrendList => trends().into(),
        QueryKind::PitchDeckFeedback => pitch_feedback().into(),
        QueryKind::FundraisingSteps => fundraising_steps(
            query.param_str_or(keys::SECTOR, DEFAULT_SECTOR),
            query.param_str_or(keys::STAGE, DEFAULT_STAGE),
        )
        .into(),
        QueryKind::FreeformAnswer => {
            let question = str_param(keys::QUESTION).unwrap_or(query.prompt_text());
            freeform(question).into()
        }
        QueryKind::MarketEntryReport => market_entry(
            query.param_str_or(keys::COUNTRY, DEFAULT_COUNTRY),
            query.param_str_or(keys::SECTOR, DEFAULT_SECTOR),
        )
        .into(),
        QueryKind::ImpactStatement => impact(
            query.param_f64(keys::USERS).unwrap_or(0.0),
            query.param_str_or(keys::CONDITION, DEFAULT_CONDITION),
        )
        .into(),
        QueryKind::DealsSummary => deals(
            str_param(keys::SECTOR),
            str_param(keys::STAGE),
            str_param(keys::COUNTRY),
        )
        .into(),
        QueryKind::GrantSuggestions => grants(
            str_param(keys::SECTOR),
            str_param(keys::GRANT_TYPE),
            str_param(keys::COUNTRY),
        )
        .into(),
        QueryKind::InvestorMatches => investors(str_param(keys::STAGE)).into(),
        QueryKind::IntroEmail => intro_email(
            query.param_str_or(keys::INVESTOR, DEFAULT_INVESTOR),
            query.param_str_or(keys::COMPANY, DEFAULT_COMPANY),
            query.param_str_or(keys::SECTOR, DEFAULT_SECTOR),
            query.param_str_or(keys::STAGE, DEFAULT_STAGE),
        )
        .into(),
    }
}

/// Baseline risk score for a country name, e.g. "South Africa" -> 55
pub fn country_baseline(country: &str) -> i64 {
    let key: String = country
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    COUNTRY_BASELINES
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(DEFAULT_COUNTRY_BASELINE, |(_, score)| *score)
}

pub fn standard_risk_factors() -> Vec<String> {
    RISK_FACTORS.iter().map(|f| f.to_string()).collect()
}

pub fn risk_assessment(country: &str) -> RiskAssessment {
    RiskAssessment::new(country_baseline(country), standard_risk_factors())
}

pub fn competitors(company: &str) -> CompetitorList {
    CompetitorList::new([
        format!("{} Labs", company),
        format!("{} Health", company),
        format!("{} Diagnostics", company),
        "MedTech Solutions".to_string(),
        "HealthConnect Africa".to_string(),
    ])
}

/// Valuation band for a funding stage; unknown stages get the seed band
pub fn valuation(stage: &str) -> ValuationRange {
    let stage = stage.trim().to_lowercase();
    let (_, low, high) = STAGE_VALUATIONS
        .iter()
        .find(|(name, _, _)| *name == stage)
        .unwrap_or(&STAGE_VALUATIONS[1]);

    ValuationRange {
        low_usd: *low,
        high_usd: *high,
        currency: "USD".to_string(),
    }
}

pub fn due_diligence(company: &str) -> SwotSummary {
    SwotSummary::new(
        vec![
            format!("Strong clinical partnerships in pilot regions for {}", company),
            "Proven technology platform".to_string(),
            "Experienced founding team".to_string(),
        ],
        owned(&[
            "Limited distribution footprint beyond 3 countries",
            "Dependence on key partnerships",
            "Limited brand recognition",
        ]),
        owned(&[
            "Rising non-communicable disease burden driving demand",
            "Government support for digital health",
            "Growing smartphone penetration",
        ]),
        owned(&[
            "Regulatory timeline variability and FX exposure",
            "Increasing competition",
            "Economic volatility",
        ]),
        owned(&[
            "How does CAC compare to LTV by segment?",
            "What regulatory path and timelines are required?",
            "What are top 3 scale risks and mitigations?",
        ]),
    )
}

pub fn trends() -> TrendList {
    TrendList::new(
        TRENDS
            .iter()
            .map(|(topic, change)| TrendEntry::new(*topic, *change)),
    )
}

pub fn pitch_feedback() -> PitchDeckFeedback {
    PitchDeckFeedback::new(PITCH_FEEDBACK)
}

pub fn fundraising_steps(sector: &str, stage: &str) -> FundraisingSteps {
    FundraisingSteps::new([
        format!("Start with specialized {} angels and micro-VCs", sector),
        format!("Sequence regional funds active at {} stage", stage),
        "Prepare outreach to 3-5 international funds for signal".to_string(),
        "Line up strategic corporates for partnerships".to_string(),
        "Time the close in tranches around milestones".to_string(),
    ])
}

pub fn freeform(question: &str) -> FreeformAnswer {
    FreeformAnswer::new(format!(
        "I'm sorry, but the AI service is currently unavailable. Please check that the \
         backend server is running and try again.\n\nYour question: {}",
        question.trim()
    ))
}

pub fn market_entry(country: &str, sector: &str) -> MarketEntryReport {
    MarketEntryReport::new(
        vec![
            format!("Growing demand for {} solutions in {}", sector, country),
            "Supportive digital health policy frameworks in select regions".to_string(),
            "Under-served rural and peri-urban populations".to_string(),
            "Increasing smartphone and internet penetration".to_string(),
            "Government initiatives supporting healthcare innovation".to_string(),
        ],
        owned(&ENTRY_CHALLENGES),
    )
}

pub fn impact(users: f64, condition: &str) -> ImpactStatement {
    let engagements = (users.max(0.0) * 0.35).round() as u64;
    ImpactStatement {
        statement: format!(
            "Estimated {} meaningful engagements for {}, with projected adherence improvement of 8-12%.",
            engagements, condition
        ),
    }
}

pub fn deals(sector: Option<&str>, stage: Option<&str>, country: Option<&str>) -> DealsSummary {
    let parts: Vec<String> = [
        sector.map(|s| format!("sector {}", s)),
        stage.map(|s| format!("stage {}", s)),
        country.map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect();

    let scope = if parts.is_empty() {
        "recent healthcare deals in Africa".to_string()
    } else {
        parts.join(", ")
    };

    DealsSummary {
        summary: format!(
            "Summary for {}:\n\
             \n\
             Key Points:\n\
             • Notable seed rounds in AI diagnostics and digital health\n\
             • Growth equity investments in telemedicine platforms\n\
             • Strategic acquisitions in medical devices and diagnostics\n\
             • Increased focus on last-mile healthcare delivery solutions\n\
             • Growing investor interest in health tech infrastructure\n\
             \n\
             Takeaway: Investor appetite remains selective but strong for companies with proven \
             traction, clear unit economics, and strong local partnerships.",
            scope
        ),
    }
}

pub fn grants(
    sector: Option<&str>,
    grant_type: Option<&str>,
    country: Option<&str>,
) -> GrantSuggestions {
    GrantSuggestions::new([
        format!(
            "Global Health Innovation Fund ({}): Supports innovative healthcare solutions with focus on scalability and impact.",
            country.unwrap_or("Africa")
        ),
        format!(
            "Digital Health Catalyst ({}): Accelerates digital health startups with funding and mentorship support.",
            sector.unwrap_or("Health Tech")
        ),
        format!(
            "Impact Acceleration Grant ({}): Provides funding for healthcare solutions with measurable social impact.",
            grant_type.unwrap_or("General")
        ),
        "African Development Bank Health Grant: Supports healthcare infrastructure and innovation across African markets.".to_string(),
        "Bill & Melinda Gates Foundation Global Health Grant: Funds innovative solutions addressing key health challenges in Africa.".to_string(),
    ])
}

/// Stage-aware investor shortlist
pub fn investors(stage: Option<&str>) -> InvestorMatches {
    let stage = stage.unwrap_or_default().to_lowercase();
    let list = if stage.contains("seed") {
        SEED_INVESTORS
    } else if stage.contains("series a") {
        SERIES_A_INVESTORS
    } else {
        GENERAL_INVESTORS
    };
    InvestorMatches::new(list)
}

pub fn intro_email(investor: &str, company: &str, sector: &str, stage: &str) -> IntroEmail {
    IntroEmail {
        subject: Some(format!("{} - {} Stage {} Opportunity", company, stage, sector)),
        body: format!(
            "Hi {investor},\n\
             \n\
             I hope this email finds you well. I'm reaching out from {company}, a {sector} company at the {stage} stage.\n\
             \n\
             We're building innovative solutions for the African healthcare market and have been following \
             {investor}'s work in the space. We're seeing strong early traction and believe there could be \
             alignment with your investment focus.\n\
             \n\
             We would value the opportunity for a brief introductory call to explore potential fit and share \
             more about our vision and progress.\n\
             \n\
             Would you be available for a 15-20 minute call in the coming weeks?\n\
             \n\
             Best regards,\n\
             {company} Team"
        ),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
