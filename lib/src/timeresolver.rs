//! Resolution of the loosely formatted timestamps shown in forum markup.
//!
//! The forum renders "last post" times in a number of human-friendly forms:
//! a full date, a date without the year, or just a time of day for posts made
//! today. Any field that is missing is taken from a reference instant. Times
//! without an explicit offset are interpreted as UTC, which is what the forum's
//! back end uses regardless of the offset it displays.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::WatchError;

static REGEX_ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());
static REGEX_WEEKDAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+").unwrap());
static REGEX_AT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+at\s+").unwrap());
static REGEX_RELATIVE_DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(today|yesterday),?\s*").unwrap());
static REGEX_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static REGEX_COMMA_BEFORE_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*(\d{1,2}:\d{2})").unwrap());
static REGEX_ATTACHED_AM_PM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d)([ap]m)\b").unwrap());

/// Parses that produce a year below this came from a truncated year, not a real date.
const MIN_YEAR: i32 = 1000;

/// Formats carrying a full calendar date.
///
/// Two-digit year forms come before their four-digit counterparts, since `%Y`
/// happily reads "24" as the year 24.
const DATE_TIME_FORMATS: &[&str] = &[
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %I:%M:%S %p",
    "%B %d %Y %I:%M %p",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d %Y %H:%M",
    "%d %B %Y %H:%M",
    "%d %B %Y %I:%M %p",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Formats with month and day but no year. The reference year is appended before parsing.
const DATE_NO_YEAR_FORMATS: &[&str] = &[
    "%B %d, %I:%M %p",
    "%B %d %I:%M %p",
    "%B %d, %H:%M",
    "%B %d %H:%M",
    "%d %B %H:%M",
    "%m/%d %I:%M %p",
    "%m/%d %H:%M",
];

/// Time of day only, meaning "on the reference date".
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I:%M:%S %p", "%H:%M:%S", "%H:%M"];

/// Resolve a timestamp string from forum markup into an absolute UTC instant.
///
/// Missing date components are filled in from `reference`, which should
/// always be a UTC "now", regardless of the timezone the forum displays.
pub fn resolve_timestamp(raw_text: &str, reference: DateTime<Utc>) -> Result<DateTime<Utc>, WatchError> {
    let malformed = || WatchError::MalformedTimestamp(format!("'{}'", raw_text.trim()).into());

    let normalized = normalize(raw_text);
    if normalized.is_empty() {
        return Err(malformed());
    }

    // Explicit offsets win outright.
    if let Some(dt) = parse_with_offset(&normalized) {
        return Ok(dt);
    }

    let mut text = normalized.as_str();
    let mut reference_date = reference.date_naive();

    // "Today"/"yesterday" shift the reference date, and leave a time of day behind.
    if let Some(caps) = REGEX_RELATIVE_DAY.captures(text) {
        if caps[1].eq_ignore_ascii_case("yesterday") {
            reference_date -= Duration::days(1);
        }

        text = &text[caps[0].len()..];
    }

    let naive = parse_date_time(text)
        .or_else(|| parse_without_year(text, reference_date.year()))
        .or_else(|| parse_time_only(text, reference_date))
        .ok_or_else(malformed)?;

    if naive.year() < MIN_YEAR {
        return Err(malformed());
    }

    Ok(Utc.from_utc_datetime(&naive))
}

fn normalize(raw_text: &str) -> String {
    let text = REGEX_WHITESPACE.replace_all(raw_text.trim(), " ");
    let text = REGEX_WEEKDAY.replace(&text, "");
    let text = REGEX_ORDINAL.replace_all(&text, "$1");
    let text = REGEX_AT.replace_all(&text, " ");
    let text = REGEX_COMMA_BEFORE_TIME.replace_all(&text, " $1");
    let text = REGEX_ATTACHED_AM_PM.replace_all(&text, "$1 $2");

    text.trim().to_owned()
}

fn parse_with_offset(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S %z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .filter(|dt| dt.year() >= MIN_YEAR)
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDateTime::parse_from_str(text, fmt)
                .ok()
                .filter(|dt| dt.year() >= MIN_YEAR)
        })
}

fn parse_without_year(text: &str, year: i32) -> Option<NaiveDateTime> {
    let text = format!("{text} {year}");

    DATE_NO_YEAR_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&text, &format!("{fmt} %Y")).ok())
}

fn parse_time_only(text: &str, date: NaiveDate) -> Option<NaiveDateTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
        .map(|time| date.and_time(time))
}
