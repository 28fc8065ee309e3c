//src/parser.rs
use once_cell::sync::Lazy;
use regex::Regex;
use strum::IntoEnumIterator;

use crate::models::KnownActivity;

pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_CALORIES: u32 = 200;
pub const FALLBACK_ACTIVITY: &str = "Other";

// Digits, optional whitespace, then a token starting with "min"/"cal".
// Leftmost match wins, so ambiguous text resolves to the first signal
// encountered in a left-to-right scan.
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*min").expect("duration pattern is valid"));
static CALORIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*cal").expect("calories pattern is valid"));

/// Draft fields recovered from free text. The caller supplies the date,
/// the user and the original text as notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWorkout {
    pub activity: String,
    pub duration_minutes: u32,
    pub calories: u32,
}

/// Heuristically extracts a workout draft from free text.
///
/// Never fails: a missing signal falls back to `"Other"` / 30 minutes /
/// 200 calories. The activity match is prefix-anchored and
/// case-insensitive over the fixed known list, first list entry winning.
pub fn parse_notes(free_text: &str) -> ParsedWorkout {
    let trimmed = free_text.trim();

    let activity = KnownActivity::iter()
        .map(|a| a.to_string())
        .find(|name| starts_with_ignore_case(trimmed, name))
        .unwrap_or_else(|| FALLBACK_ACTIVITY.to_string());

    ParsedWorkout {
        activity,
        duration_minutes: first_number(&DURATION_RE, trimmed, DEFAULT_DURATION_MINUTES),
        calories: first_number(&CALORIES_RE, trimmed, DEFAULT_CALORIES),
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    // `get` is None on a non-char-boundary, which cannot be an ASCII match
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn first_number(re: &Regex, text: &str, default: u32) -> u32 {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(default)
}
