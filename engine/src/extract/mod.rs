//! Response Extractors
//!
//! Turns free-form provider text into typed results. Each extractor is an
//! ordered cascade of strategies: a strict format match first, then looser
//! patterns, then a generic line-splitting heuristic. The first strategy to
//! produce a usable value wins.
//!
//! Extractors are pure functions of the answer text. A total miss is
//! reported as `None`; the gateway then substitutes the kind's canned
//! result and tags it as defaulted.

use regex::Regex;
use sdk::{ExtractionResult, QueryKind};
use std::sync::OnceLock;

pub mod lists;
pub mod risk;
pub mod sections;
pub mod text;
pub mod trends;
pub mod valuation;

/// One extraction attempt over raw answer text
pub type Strategy<T> = fn(&str) -> Option<T>;

/// Run strategies in order and return the first hit
pub fn first_match<T>(text: &str, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(text))
}

/// Dispatch raw text to the extractor for `kind`
pub fn extract(kind: QueryKind, text: &str) -> Option<ExtractionResult> {
    let result = match kind {
        QueryKind::RiskAssessment => risk::extract(text)?.into(),
        QueryKind::CompetitorList => lists::competitors(text)?.into(),
        QueryKind::ValuationRange => valuation::extract(text)?.into(),
        QueryKind::DueDiligenceSummary => sections::due_diligence(text)?.into(),
        QueryKind::TrendList => trends::extract(text)?.into(),
        QueryKind::PitchDeckFeedback => lists::pitch_feedback(text)?.into(),
        QueryKind::FundraisingSteps => lists::fundraising_steps(text)?.into(),
        QueryKind::FreeformAnswer => text::freeform(text)?.into(),
        QueryKind::MarketEntryReport => sections::market_entry(text)?.into(),
        QueryKind::ImpactStatement => text::impact(text)?.into(),
        QueryKind::DealsSummary => text::deals(text)?.into(),
        QueryKind::GrantSuggestions => lists::grants(text)?.into(),
        QueryKind::InvestorMatches => lists::investors(text)?.into(),
        QueryKind::IntroEmail => text::intro_email(text)?.into(),
    };
    Some(result)
}

/// Leading bullets, numbering and whitespace
static MARKER_PATTERN: OnceLock<Regex> = OnceLock::new();

/// A line that opens a new labelled section, e.g. `THREATS:` or `KEY QUESTIONS:`
static HEADER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn marker_regex() -> &'static Regex {
    MARKER_PATTERN
        .get_or_init(|| Regex::new(r"^[-•*\d+.)\s]+").expect("Invalid marker pattern"))
}

fn header_regex() -> &'static Regex {
    HEADER_PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[#*]+\s*)?(?:[A-Za-z][A-Za-z ]{0,40}:\s*$|[A-Z][A-Z ]*[A-Z]:)")
            .expect("Invalid header pattern")
    })
}

/// Strip list markers from the start of a line
pub fn strip_marker(line: &str) -> &str {
    let line = line.trim();
    match marker_regex().find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}

/// Non-empty lines with list markers stripped
pub fn clean_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(strip_marker).filter(|line| !line.is_empty())
}

pub fn is_header(line: &str) -> bool {
    header_regex().is_match(line.trim())
}

/// Case-insensitive check for any of `prefixes` as a leading word
pub fn has_noise_prefix(line: &str, prefixes: &[&str]) -> bool {
    let lower = line.trim_start().to_lowercase();
    prefixes.iter().any(|prefix| {
        lower.strip_prefix(prefix).is_some_and(|rest| {
            rest.chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
        })
    })
}

/// Like `has_noise_prefix` but without a word boundary
pub fn has_loose_prefix(line: &str, prefixes: &[&str]) -> bool {
    let lower = line.trim_start().to_lowercase();
    prefixes.iter().any(|prefix| lower.starts_with(prefix))
}

/// Body lines of the section labelled `name`
///
/// A label at the start of a line is preferred over one mid-text. Content
/// after the label on the same line counts as the first body line. The body
/// ends at the next header line; blank lines inside it are skipped.
pub fn section<'a>(text: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let name = regex::escape(name);
    let at_line_start = Regex::new(&format!(r"(?im)^[\s#*\-]*{}[:\s]*", name)).ok()?;
    let anywhere = Regex::new(&format!(r"(?i){}[:\s]*", name)).ok()?;

    let found = at_line_start.find(text).or_else(|| anywhere.find(text))?;
    let body: Vec<&str> = text[found.end()..]
        .lines()
        .map(str::trim)
        .take_while(|line| !is_header(line))
        .filter(|line| !line.is_empty())
        .collect();

    (!body.is_empty()).then_some(body)
}

/// Section body cleaned into items longer than `min_len` chars
pub fn section_items(text: &str, name: &str, min_len: usize, max: usize) -> Vec<String> {
    section(text, name)
        .unwrap_or_default()
        .into_iter()
        .map(strip_marker)
        .filter(|line| line.chars().count() > min_len)
        .take(max)
        .map(str::to_string)
        .collect()
}

/// `Some(items)` unless empty
pub(crate) fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    (!items.is_empty()).then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("- Item"), "Item");
        assert_eq!(strip_marker("  3) Third"), "Third");
        assert_eq!(strip_marker("• Bullet"), "Bullet");
        assert_eq!(strip_marker("12. Twelfth"), "Twelfth");
        assert_eq!(strip_marker("* starred"), "starred");
        assert_eq!(strip_marker("Plain"), "Plain");
    }

    #[test]
    fn test_is_header() {
        assert!(is_header("THREATS:"));
        assert!(is_header("KEY QUESTIONS:"));
        assert!(is_header("Challenges:"));
        assert!(is_header("RISK SCORE: 62"));
        assert!(is_header("## OPPORTUNITIES:"));
        assert!(!is_header("- Regulatory: long approval times"));
        assert!(!is_header("Regulatory: long approval times"));
    }

    #[test]
    fn test_noise_prefix_respects_word_boundary() {
        let noise = ["the", "top"];
        assert!(has_noise_prefix("The following companies", &noise));
        assert!(has_noise_prefix("Top 5:", &noise));
        assert!(!has_noise_prefix("Thermo Fisher", &noise));
        assert!(has_loose_prefix("Thermo Fisher", &noise));
    }

    #[test]
    fn test_section_stops_at_next_header() {
        let text = "STRENGTHS:\n- Strong partnerships\n- Solid team\n\nWEAKNESSES:\n- Small footprint";
        assert_eq!(
            section(text, "STRENGTHS").unwrap(),
            vec!["- Strong partnerships", "- Solid team"]
        );
        assert_eq!(section(text, "weaknesses").unwrap(), vec!["- Small footprint"]);
        assert!(section(text, "THREATS").is_none());
    }

    #[test]
    fn test_section_inline_content() {
        let text = "OPPORTUNITIES: mobile money integration\nCHALLENGES: power outages";
        assert_eq!(
            section(text, "opportunities").unwrap(),
            vec!["mobile money integration"]
        );
    }

    #[test]
    fn test_extract_routes_by_kind() {
        let text = "RISK SCORE: 40\nRISK FACTORS:\n- Currency depreciation risk";
        let result = extract(QueryKind::RiskAssessment, text).unwrap();
        assert_eq!(result.kind(), QueryKind::RiskAssessment);

        assert!(extract(QueryKind::ImpactStatement, "too short").is_none());
    }
}
