//! Valuation range extraction
//!
//! Four range patterns are tried in order, each against its first match
//! only. A pair that violates `0 < low < high` is discarded and the next
//! pattern runs. Figures are read as USD millions.

use regex::Regex;
use sdk::ValuationRange;
use std::sync::OnceLock;

const MILLION: f64 = 1_000_000.0;

static RANGE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn range_patterns() -> &'static Vec<Regex> {
    RANGE_PATTERNS.get_or_init(|| {
        vec![
            // "2 - $6 million", "2 to 6 million"
            Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*[-to]+\s*\$?\s*(\d+(?:\.\d+)?)\s*million")
                .expect("Invalid million range pattern"),
            // "$2 - $6 million"
            Regex::new(r"(?i)\$(\d+(?:\.\d+)?)\s*[-to]+\s*\$?(\d+(?:\.\d+)?)\s*million")
                .expect("Invalid dollar range pattern"),
            // "2-6M"
            Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*[-to]+\s*(\d+(?:\.\d+)?)\s*m")
                .expect("Invalid short range pattern"),
            // bare "2-6"
            Regex::new(r"(\d+(?:\.\d+)?)\s*[-to]+\s*(\d+(?:\.\d+)?)")
                .expect("Invalid bare range pattern"),
        ]
    })
}

/// Extract a USD valuation range
pub fn extract(text: &str) -> Option<ValuationRange> {
    range_patterns()
        .iter()
        .find_map(|pattern| range_from(pattern, text))
}

fn range_from(pattern: &Regex, text: &str) -> Option<ValuationRange> {
    let caps = pattern.captures(text)?;
    let low: f64 = caps.get(1)?.as_str().parse().ok()?;
    let high: f64 = caps.get(2)?.as_str().parse().ok()?;
    ValuationRange::usd(low * MILLION, high * MILLION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollar_million_range() {
        let range = extract("VALUATION RANGE: $2 - $6 million USD").unwrap();
        assert_eq!(range.low_usd, 2_000_000.0);
        assert_eq!(range.high_usd, 6_000_000.0);
        assert_eq!(range.currency, "USD");
    }

    #[test]
    fn test_to_separator_and_decimals() {
        let range = extract("Typically 1.5 to 3 million for pre-seed").unwrap();
        assert_eq!(range.low_usd, 1_500_000.0);
        assert_eq!(range.high_usd, 3_000_000.0);
    }

    #[test]
    fn test_short_suffix() {
        let range = extract("Expect 5-12M at Series A").unwrap();
        assert_eq!(range.low_usd, 5_000_000.0);
        assert_eq!(range.high_usd, 12_000_000.0);
    }

    #[test]
    fn test_inverted_pair_rejected() {
        assert!(extract("$3 million - $2 million").is_none());
        assert!(extract("$5 - $2 million").is_none());
    }

    #[test]
    fn test_no_range() {
        assert!(extract("Valuations vary widely.").is_none());
    }
}
