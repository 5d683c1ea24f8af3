//! Line-list extraction
//!
//! Names, steps and suggestions requested one per line. Markers are
//! stripped, then lines are filtered by length and a noise-word prefix
//! list that catches preambles such as "Here are the top 5 competitors:".

use sdk::results::{MAX_FEEDBACK_POINTS, MAX_LIST_ITEMS};
use sdk::{CompetitorList, FundraisingSteps, GrantSuggestions, InvestorMatches, PitchDeckFeedback};

use super::{clean_lines, has_noise_prefix, non_empty};

const COMPETITOR_NOISE: &[&str] = &[
    "competitor",
    "competitors",
    "company",
    "companies",
    "name",
    "names",
    "list",
    "top",
    "here",
    "are",
    "the",
];

const INVESTOR_NOISE: &[&str] = &[
    "investor",
    "investors",
    "name",
    "names",
    "list",
    "top",
    "here",
    "are",
    "the",
    "matching",
];

/// Grant answers shorter than this are not trusted
const MIN_GRANT_ANSWER_CHARS: usize = 50;

pub fn competitors(text: &str) -> Option<CompetitorList> {
    names(text, COMPETITOR_NOISE).map(CompetitorList::new)
}

pub fn investors(text: &str) -> Option<InvestorMatches> {
    names(text, INVESTOR_NOISE).map(InvestorMatches::new)
}

/// Feedback points longer than 10 chars, at most seven
pub fn pitch_feedback(text: &str) -> Option<PitchDeckFeedback> {
    lines_longer_than(text, 10, MAX_FEEDBACK_POINTS).map(PitchDeckFeedback::new)
}

pub fn fundraising_steps(text: &str) -> Option<FundraisingSteps> {
    lines_longer_than(text, 0, MAX_LIST_ITEMS).map(FundraisingSteps::new)
}

/// Grant lines longer than 10 chars, from an answer of some substance
pub fn grants(text: &str) -> Option<GrantSuggestions> {
    if text.trim().chars().count() <= MIN_GRANT_ANSWER_CHARS {
        return None;
    }
    lines_longer_than(text, 10, MAX_LIST_ITEMS).map(GrantSuggestions::new)
}

fn names(text: &str, noise: &[&str]) -> Option<Vec<String>> {
    let items = clean_lines(text)
        .filter(|line| line.chars().count() > 2 && !has_noise_prefix(line, noise))
        .take(MAX_LIST_ITEMS)
        .map(str::to_string)
        .collect();
    non_empty(items)
}

fn lines_longer_than(text: &str, min_chars: usize, max: usize) -> Option<Vec<String>> {
    let items = clean_lines(text)
        .filter(|line| line.chars().count() > min_chars)
        .take(max)
        .map(str::to_string)
        .collect();
    non_empty(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competitor_preamble_filtered() {
        let text = "Here are the top 5 competitors:\n1. Helium Health\n2. mPharma\n3. Thermo Fisher\n4. Ok";
        let list = competitors(text).unwrap();
        assert_eq!(list.competitors, vec!["Helium Health", "mPharma", "Thermo Fisher"]);
    }

    #[test]
    fn test_competitors_capped() {
        let text = (1..=9)
            .map(|i| format!("Company{}", i))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(competitors(&text).unwrap().competitors.len(), 5);
    }

    #[test]
    fn test_investor_noise() {
        let text = "Matching investors:\n- TLcom Capital\n- Partech Africa";
        assert_eq!(
            investors(text).unwrap().investors,
            vec!["TLcom Capital", "Partech Africa"]
        );
    }

    #[test]
    fn test_pitch_feedback_caps_at_seven() {
        let text = (1..=10)
            .map(|i| format!("{}. Actionable point number {}", i, i))
            .collect::<Vec<_>>()
            .join("\n");
        let feedback = pitch_feedback(&text).unwrap();
        assert_eq!(feedback.feedback.len(), 7);
        assert_eq!(feedback.feedback[0], "Actionable point number 1");
    }

    #[test]
    fn test_fundraising_steps() {
        let text = "1. Close angels\n2. Approach regional funds\n\n3. Line up corporates";
        assert_eq!(fundraising_steps(text).unwrap().steps.len(), 3);
    }

    #[test]
    fn test_short_grant_answer_rejected() {
        assert!(grants("Try the Gates Foundation.").is_none());

        let text = "1. Grand Challenges Africa - funds early research\n2. USAID DIV - staged grants for proven pilots";
        assert_eq!(grants(text).unwrap().grants.len(), 2);
    }
}
