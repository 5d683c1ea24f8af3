//! Labelled-section extraction for due diligence and market entry
//!
//! Both answers are requested as `LABEL:` headers followed by bullet lists.
//! Each section is parsed independently; a missing section gets a single
//! stock entry so that partial answers still produce a complete result.

use regex::Regex;
use sdk::results::{MAX_QUESTIONS, MAX_SECTION_ITEMS};
use sdk::{MarketEntryReport, SwotSummary};
use std::sync::OnceLock;

use super::{first_match, non_empty, section, section_items, strip_marker, Strategy};

/// Section lines must be longer than this
const MIN_ITEM_CHARS: usize = 5;

pub const DEFAULT_STRENGTH: &str = "Strong market position and partnerships";
pub const DEFAULT_WEAKNESS: &str = "Limited geographic reach";
pub const DEFAULT_OPPORTUNITY: &str = "Growing market demand";
pub const DEFAULT_THREAT: &str = "Regulatory changes";

pub const DEFAULT_QUESTIONS: [&str; 3] = [
    "What is the customer acquisition cost (CAC) and lifetime value (LTV)?",
    "What regulatory approvals are required and what are the timelines?",
    "What are the top 3 scalability risks and mitigation strategies?",
];

pub const DEFAULT_ENTRY_OPPORTUNITY: &str = "Growing demand for digital health solutions";
pub const DEFAULT_ENTRY_CHALLENGE: &str = "Fragmented reimbursement and procurement systems";

static NUMBERED_QUESTION: OnceLock<Regex> = OnceLock::new();

fn numbered_question() -> &'static Regex {
    NUMBERED_QUESTION.get_or_init(|| {
        Regex::new(r"\d+[.)]\s*([^\n]+\?)").expect("Invalid numbered question pattern")
    })
}

/// Extract a SWOT summary with follow-up questions
///
/// Returns `None` when no section and no question is found.
pub fn due_diligence(text: &str) -> Option<SwotSummary> {
    let strengths = swot_section(text, "STRENGTHS");
    let weaknesses = swot_section(text, "WEAKNESSES");
    let opportunities = swot_section(text, "OPPORTUNITIES");
    let threats = swot_section(text, "THREATS");
    let questions = questions(text);

    let nothing_found = [&strengths, &weaknesses, &opportunities, &threats]
        .iter()
        .all(|items| items.is_empty())
        && questions.is_none();
    if nothing_found {
        return None;
    }

    Some(SwotSummary::new(
        or_single(strengths, DEFAULT_STRENGTH),
        or_single(weaknesses, DEFAULT_WEAKNESS),
        or_single(opportunities, DEFAULT_OPPORTUNITY),
        or_single(threats, DEFAULT_THREAT),
        questions.unwrap_or_else(|| DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()),
    ))
}

/// Extract a market-entry report
///
/// Returns `None` when neither section is present.
pub fn market_entry(text: &str) -> Option<MarketEntryReport> {
    let opportunities = swot_section(text, "OPPORTUNITIES");
    let challenges = swot_section(text, "CHALLENGES");

    if opportunities.is_empty() && challenges.is_empty() {
        return None;
    }

    Some(MarketEntryReport::new(
        or_single(opportunities, DEFAULT_ENTRY_OPPORTUNITY),
        or_single(challenges, DEFAULT_ENTRY_CHALLENGE),
    ))
}

/// Due-diligence questions by cascade
pub fn questions(text: &str) -> Option<Vec<String>> {
    const STRATEGIES: &[Strategy<Vec<String>>] = &[
        key_questions_section,
        any_questions_section,
        numbered_questions,
        question_lines,
    ];
    first_match(text, STRATEGIES)
}

fn key_questions_section(text: &str) -> Option<Vec<String>> {
    questions_in_section(text, "KEY QUESTIONS")
}

fn any_questions_section(text: &str) -> Option<Vec<String>> {
    questions_in_section(text, "questions")
}

fn questions_in_section(text: &str, name: &str) -> Option<Vec<String>> {
    let items = section(text, name)?
        .into_iter()
        .map(strip_marker)
        .filter(|line| line.chars().count() > MIN_ITEM_CHARS && line.contains('?'))
        .take(MAX_QUESTIONS)
        .map(str::to_string)
        .collect();
    non_empty(items)
}

fn numbered_questions(text: &str) -> Option<Vec<String>> {
    let items = numbered_question()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .take(MAX_QUESTIONS)
        .collect();
    non_empty(items)
}

fn question_lines(text: &str) -> Option<Vec<String>> {
    let items = text
        .lines()
        .filter(|line| line.contains('?'))
        .map(strip_marker)
        .filter(|line| !line.is_empty())
        .take(MAX_QUESTIONS)
        .map(str::to_string)
        .collect();
    non_empty(items)
}

fn swot_section(text: &str, name: &str) -> Vec<String> {
    section_items(text, name, MIN_ITEM_CHARS, MAX_SECTION_ITEMS)
}

fn or_single(items: Vec<String>, default: &str) -> Vec<String> {
    if items.is_empty() {
        vec![default.to_string()]
    } else {
        items
    }
}
