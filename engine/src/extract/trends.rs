//! Trend extraction
//!
//! One trend per line. The first signed percentage on a line becomes the
//! growth indicator and is removed from the topic.

use regex::Regex;
use sdk::{TrendEntry, TrendList};
use std::sync::OnceLock;

use super::clean_lines;

/// Topics must be longer than this
const MIN_TOPIC_CHARS: usize = 5;

/// Change reported when a line carries no percentage
pub const NO_CHANGE: &str = "n/a";

static PERCENT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn percent_pattern() -> &'static Regex {
    PERCENT_PATTERN.get_or_init(|| {
        Regex::new(r"[+\-]?\d+(?:\.\d+)?%").expect("Invalid percent pattern")
    })
}

/// Extract up to five trends
pub fn extract(text: &str) -> Option<TrendList> {
    let trends = TrendList::new(clean_lines(text).filter_map(parse_line));
    (!trends.entries.is_empty()).then_some(trends)
}

fn parse_line(line: &str) -> Option<TrendEntry> {
    let (topic, change) = match percent_pattern().find(line) {
        Some(m) => {
            let topic = format!("{}{}", &line[..m.start()], &line[m.end()..]);
            (tidy_topic(&topic), m.as_str().to_string())
        }
        None => (tidy_topic(line), NO_CHANGE.to_string()),
    };

    (topic.chars().count() > MIN_TOPIC_CHARS).then(|| TrendEntry::new(topic, change))
}

/// Drop separators and empty brackets left behind by the removed percentage
fn tidy_topic(topic: &str) -> String {
    topic
        .replace("()", "")
        .trim()
        .trim_end_matches(|c: char| matches!(c, ':' | '-' | '–' | ',' | '(') || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_extracted() {
        let text = "1. Telemedicine uptake: +22%\n2. AI diagnostics in primary care (-3%)\n3. Wearables adoption";
        let trends = extract(text).unwrap();

        assert_eq!(trends.entries.len(), 3);
        assert_eq!(trends.entries[0], TrendEntry::new("Telemedicine uptake", "+22%"));
        assert_eq!(trends.entries[1].topic, "AI diagnostics in primary care");
        assert_eq!(trends.entries[1].change, "-3%");
        assert_eq!(trends.entries[2].change, NO_CHANGE);
    }

    #[test]
    fn test_short_topics_dropped_and_capped() {
        let mut lines = vec!["- Tiny".to_string()];
        lines.extend((1..=8).map(|i| format!("- Growing segment number {} +{}%", i, i)));
        let trends = extract(&lines.join("\n")).unwrap();

        assert_eq!(trends.entries.len(), 5);
        assert_eq!(trends.entries[0].topic, "Growing segment number 1");
        assert_eq!(trends.entries[0].change, "+1%");
    }

    #[test]
    fn test_decimal_percentages_kept_whole() {
        let text = "- Digital pharmacy growth: 12.5%\n- Health insurance uptake (+0.8%)";
        let trends = extract(text).unwrap();

        assert_eq!(
            trends.entries[0],
            TrendEntry::new("Digital pharmacy growth", "12.5%")
        );
        assert_eq!(
            trends.entries[1],
            TrendEntry::new("Health insurance uptake", "+0.8%")
        );
    }

    #[test]
    fn test_no_trends() {
        assert!(extract("n/a\n\n-").is_none());
    }
}
