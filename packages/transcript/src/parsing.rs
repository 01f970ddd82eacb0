//! Date and season parsing for index page text.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// `(M/D/YY)` anywhere in a title cell.
static AIRDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d{1,2})/(\d{1,2})/(\d{2})\)").expect("valid regex")
});

/// `Season N`, case-insensitive.
static SEASON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)season\s*(\d+)").expect("valid regex"));

/// The word `season` or `pilot`, optionally run into a season number.
static HEADER_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:season|pilot)(?:\d+)?\b").expect("valid regex")
});

/// A four-digit year in parentheses.
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{4})\)").expect("valid regex"));

/// Two-digit years at or above this pivot belong to the 1900s.
const CENTURY_PIVOT: i32 = 69;

/// Expands a two-digit year: `69..=99` → 19xx, `00..=68` → 20xx.
#[must_use]
pub const fn expand_two_digit_year(yy: i32) -> i32 {
    if yy >= CENTURY_PIVOT { 1900 + yy } else { 2000 + yy }
}

/// Parses the first `(M/D/YY)` airdate in `text`.
///
/// Returns `None` if there is no such pattern or it names an impossible date.
#[must_use]
pub fn parse_airdate(text: &str) -> Option<NaiveDate> {
    let caps = AIRDATE_RE.captures(text)?;
    let month = caps[1].parse::<u32>().ok()?;
    let day = caps[2].parse::<u32>().ok()?;
    let yy = caps[3].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(expand_two_digit_year(yy), month, day)
}

/// Whether `text` names a season or the pilot as a whole word.
#[must_use]
pub fn mentions_season_or_pilot(text: &str) -> bool {
    HEADER_WORD_RE.is_match(text)
}

/// Parses the season number from a header such as `"Season 3 (1991)"`.
#[must_use]
pub fn parse_season_number(text: &str) -> Option<u32> {
    SEASON_RE.captures(text)?[1].parse().ok()
}

/// Parses a parenthesized four-digit year as January 1st of that year.
#[must_use]
pub fn parse_season_year(text: &str) -> Option<NaiveDate> {
    let year = YEAR_RE.captures(text)?[1].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}
