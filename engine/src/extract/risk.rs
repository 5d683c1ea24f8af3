//! Market risk extraction
//!
//! Score cascade: `RISK SCORE: <n>`, then `score: <n>`, then `<n>/100`.
//! Factor cascade: the `RISK FACTORS` section, then any `factors` section,
//! then a generic split on newlines, numbering, dashes and bullets.

use regex::Regex;
use sdk::RiskAssessment;
use std::sync::OnceLock;

use super::{first_match, has_loose_prefix, non_empty, section, strip_marker, Strategy};
use crate::fallback;

/// Score used when the answer carries factors but no number
pub const DEFAULT_SCORE: i64 = 60;

/// Factor lines must be longer than this
const MIN_FACTOR_CHARS: usize = 10;

const SECTION_NOISE: &[&str] = &["risk", "factor", "score"];
const GENERIC_NOISE: &[&str] = &["risk", "factor", "score", "country"];

/// Score patterns, strictest first
static SCORE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

static GENERIC_SPLIT: OnceLock<Regex> = OnceLock::new();

fn score_patterns() -> &'static Vec<Regex> {
    SCORE_PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)RISK SCORE[:\s]+(-?\d+)").expect("Invalid risk score pattern"),
            Regex::new(r"(?i)score[:\s]+(-?\d+)").expect("Invalid score pattern"),
            Regex::new(r"(-?\d+)\s*/\s*100").expect("Invalid ratio pattern"),
        ]
    })
}

fn generic_split() -> &'static Regex {
    GENERIC_SPLIT.get_or_init(|| Regex::new(r"\n|\d+\.|-|•").expect("Invalid split pattern"))
}

/// Extract a risk assessment
///
/// Returns `None` only when neither a score nor a single factor is found.
/// A missing half is filled in: score 60, or the standard factor list.
pub fn extract(text: &str) -> Option<RiskAssessment> {
    let score = score(text);
    let factors = factors(text);

    if score.is_none() && factors.is_none() {
        return None;
    }

    Some(RiskAssessment::new(
        score.unwrap_or(DEFAULT_SCORE),
        factors.unwrap_or_else(fallback::standard_risk_factors),
    ))
}

/// First score any pattern finds, unclamped
pub fn score(text: &str) -> Option<i64> {
    score_patterns().iter().find_map(|pattern| {
        let digits = pattern.captures(text)?.get(1)?.as_str();
        Some(parse_saturating(digits))
    })
}

/// Risk factors by cascade
pub fn factors(text: &str) -> Option<Vec<String>> {
    const STRATEGIES: &[Strategy<Vec<String>>] =
        &[labelled_factors, any_factors_section, generic_factors];
    first_match(text, STRATEGIES)
}

fn labelled_factors(text: &str) -> Option<Vec<String>> {
    section_factors(text, "RISK FACTORS")
}

fn any_factors_section(text: &str) -> Option<Vec<String>> {
    section_factors(text, "factors")
}

fn section_factors(text: &str, name: &str) -> Option<Vec<String>> {
    let items = section(text, name)?
        .into_iter()
        .map(strip_marker)
        .filter(|line| is_factor(line, SECTION_NOISE))
        .map(str::to_string)
        .collect();
    non_empty(items)
}

fn generic_factors(text: &str) -> Option<Vec<String>> {
    let items = generic_split()
        .split(text)
        .map(strip_marker)
        .filter(|part| is_factor(part, GENERIC_NOISE))
        .map(str::to_string)
        .collect();
    non_empty(items)
}

fn is_factor(line: &str, noise: &[&str]) -> bool {
    line.chars().count() > MIN_FACTOR_CHARS && !has_loose_prefix(line, noise)
}

/// Parse an optionally negative integer, saturating on overflow
fn parse_saturating(digits: &str) -> i64 {
    digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_answer() {
        let text = "RISK SCORE: 62\nRISK FACTORS:\n- Regulatory complexity\n- FX volatility";
        let result = extract(text).unwrap();
        assert_eq!(result.score, 62);
        assert_eq!(result.factors, vec!["Regulatory complexity", "FX volatility"]);
    }

    #[test]
    fn test_score_clamped_high() {
        let result = extract("RISK SCORE: 150").unwrap();
        assert_eq!(result.score, 100);
        assert_eq!(result.factors.len(), 5);
    }

    #[test]
    fn test_score_clamped_low() {
        assert_eq!(extract("RISK SCORE: -5").unwrap().score, 0);
    }

    #[test]
    fn test_score_overflow_saturates() {
        assert_eq!(
            extract("RISK SCORE: 99999999999999999999999").unwrap().score,
            100
        );
    }

    #[test]
    fn test_looser_score_patterns() {
        assert_eq!(score("Overall score: 47 given current conditions"), Some(47));
        assert_eq!(score("We rate this market 71/100."), Some(71));
        assert_eq!(score("No numbers here"), None);
    }

    #[test]
    fn test_factors_capped_in_order() {
        let bullets: Vec<String> = (1..=12)
            .map(|i| format!("- Distinct factor number {}", i))
            .collect();
        let text = format!("RISK SCORE: 55\nRISK FACTORS:\n{}", bullets.join("\n"));

        let result = extract(&text).unwrap();
        assert_eq!(result.factors.len(), 5);
        assert_eq!(result.factors[0], "Distinct factor number 1");
        assert_eq!(result.factors[4], "Distinct factor number 5");
    }

    #[test]
    fn test_generic_split_without_labels() {
        let text = "Here is my view.\n1. Currency devaluation pressures\n2. Fragmented supply chains";
        let result = extract(text).unwrap();
        assert_eq!(result.score, DEFAULT_SCORE as u8);
        assert_eq!(
            result.factors,
            vec![
                "Here is my view.",
                "Currency devaluation pressures",
                "Fragmented supply chains"
            ]
        );
    }

    #[test]
    fn test_noise_lines_filtered() {
        let text = "RISK FACTORS:\n- Risk factors are listed below\n- Weak cold-chain logistics";
        let result = extract(text).unwrap();
        assert_eq!(result.factors, vec!["Weak cold-chain logistics"]);
    }

    #[test]
    fn test_nothing_usable() {
        assert!(extract("ok").is_none());
    }
}
