//! Text normalization for scraped display strings.
//!
//! The upstream site prints counts as "12,345" or "1.3M" and dates as
//! "3 days ago" or "Feb 4, 2025" depending on page and locale. Everything
//! here is best-effort: malformed input yields `None`, never an error.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;

/// Parse a displayed integer, tolerating thousands separators and
/// surrounding non-digit text ("12,345 players" -> 12345).
///
/// All digit runs are concatenated; `None` when the text has no digits.
pub fn parse_plain_integer(text: &str) -> Option<u64> {
    let digits: String = text
        .replace(',', "")
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse an abbreviated count like "1.3M", "462.2K" or "987".
///
/// Optional decimal mantissa, optional case-insensitive K/M/B suffix,
/// rounded to the nearest integer. Text that doesn't match the pattern
/// falls back to [`parse_plain_integer`] so plain counts still parse.
pub fn parse_abbreviated_number(text: &str) -> Option<u64> {
    let cleaned = text.trim().replace(',', "");
    let re = Regex::new(r"^(\d+(?:\.\d+)?)\s*([KkMmBb])?$").ok()?;
    let Some(caps) = re.captures(&cleaned) else {
        return parse_plain_integer(text);
    };
    let mantissa: f64 = caps.get(1)?.as_str().parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("K") | Some("k") => 1_000.0,
        Some("M") | Some("m") => 1_000_000.0,
        Some("B") | Some("b") => 1_000_000_000.0,
        _ => 1.0,
    };
    Some((mantissa * multiplier).round() as u64)
}

/// Parse the date text the site attaches to "Updated" / "Release Date"
/// stats. Two families are recognized:
///
/// - relative phrases: "<N> <unit> ago" for second/minute/hour/day/week/
///   month/year (month taken as 30 days, year as 365 days);
/// - absolute dates in a fixed list of formats, tried in order.
///
/// The site's date text is inconsistent between islands, so this is
/// inherently lossy; anything unrecognized is `None`.
pub fn parse_relative_or_absolute_date(text: &str) -> Option<DateTime<Utc>> {
    parse_date_at(text, Utc::now())
}

/// Absolute date formats tried in order. chrono's `%b` accepts full month
/// names as well, so "February 4, 2025" parses via the "%b %d, %Y" entry.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%b %d, %Y", "%d %b %Y"];

fn parse_date_at(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let re = Regex::new(r"(?i)^(\d+)\s+(second|minute|hour|day|week|month|year)s?\s+ago$").ok()?;
    if let Some(caps) = re.captures(text) {
        let n: i64 = caps.get(1)?.as_str().parse().ok()?;
        let unit_secs = match caps.get(2)?.as_str().to_ascii_lowercase().as_str() {
            "second" => 1,
            "minute" => 60,
            "hour" => 3_600,
            "day" => 86_400,
            "week" => 604_800,
            "month" => 30 * 86_400,
            "year" => 365 * 86_400,
            _ => return None,
        };
        return now.checked_sub_signed(Duration::seconds(n.checked_mul(unit_secs)?));
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}
