//! Prose answers
//!
//! These kinds keep the provider text mostly as-is. Short answers are
//! treated as misses since a usable statement, summary or email is never
//! a one-liner.

use regex::Regex;
use sdk::{DealsSummary, FreeformAnswer, ImpactStatement, IntroEmail};
use std::sync::OnceLock;

/// Prose answers must be longer than this
pub const MIN_PROSE_CHARS: usize = 50;

static SUBJECT_LINE: OnceLock<Regex> = OnceLock::new();

fn subject_line() -> &'static Regex {
    SUBJECT_LINE.get_or_init(|| {
        Regex::new(r"(?im)^[\s*#]*subject[\s*]*:\s*(.+?)\s*$").expect("Invalid subject pattern")
    })
}

pub fn freeform(text: &str) -> Option<FreeformAnswer> {
    let answer = text.trim();
    (!answer.is_empty()).then(|| FreeformAnswer::new(answer))
}

pub fn impact(text: &str) -> Option<ImpactStatement> {
    substantial(text).map(|statement| ImpactStatement { statement })
}

pub fn deals(text: &str) -> Option<DealsSummary> {
    substantial(text).map(|summary| DealsSummary { summary })
}

/// Split a drafted email into subject and body
pub fn intro_email(text: &str) -> Option<IntroEmail> {
    let text = substantial(text)?;

    let Some(caps) = subject_line().captures(&text) else {
        return Some(IntroEmail {
            subject: None,
            body: text,
        });
    };

    let subject = caps.get(1).map(|m| m.as_str().trim_matches('*').trim().to_string());
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    let body = format!("{}{}", &text[..whole.start], &text[whole.end..])
        .trim()
        .to_string();

    Some(IntroEmail {
        subject: subject.filter(|s| !s.is_empty()),
        body,
    })
}

fn substantial(text: &str) -> Option<String> {
    let text = text.trim();
    (text.chars().count() > MIN_PROSE_CHARS).then(|| text.to_string())
}
