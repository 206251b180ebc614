//! Date and tag canonicalization.
//!
//! Legacy frontmatter is inconsistent: dates show up as `2021-05-01`,
//! `"May 1, 2021"`, `2021/05/01 10:00`, full RFC 3339 timestamps, and
//! sometimes not at all. Tags show up as block sequences, flow lists
//! (`[a, "b"]`) and plain comma-separated strings.
//!
//! Every date that cannot be recovered falls back to "today". That fallback
//! loses information, so it is never silent: [`normalize_date`] returns
//! [`Normalized::Defaulted`] with a reason, and the caller decides whether to
//! accept it, report it, or fail.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Output format for every normalized date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of a normalization that may have substituted a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized<T> {
    /// The input was understood.
    Parsed(T),
    /// The input was missing or unreadable; `value` is a stand-in.
    Defaulted { value: T, reason: String },
}

impl<T> Normalized<T> {
    pub fn value(&self) -> &T {
        match self {
            Normalized::Parsed(v) | Normalized::Defaulted { value: v, .. } => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Normalized::Parsed(v) | Normalized::Defaulted { value: v, .. } => v,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Normalized::Defaulted { .. })
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Canonicalize a date to `YYYY-MM-DD`.
///
/// Quote characters are stripped first. A value made of exactly three
/// dash-separated numeric parts is taken as already canonical and returned
/// verbatim. Anything else goes through a list of common formats; if none
/// match, `today` is substituted and the result is `Defaulted`.
pub fn normalize_date(raw: &str, today: NaiveDate) -> Normalized<String> {
    let cleaned: String = raw.chars().filter(|c| *c != '"' && *c != '\'').collect();
    let cleaned = cleaned.trim();

    let fallback = |reason: String| Normalized::Defaulted {
        value: today.format(DATE_FORMAT).to_string(),
        reason,
    };

    if cleaned.is_empty() {
        return fallback("no date given".to_string());
    }

    if is_dashed_numeric(cleaned) {
        return Normalized::Parsed(cleaned.to_string());
    }

    match parse_date(cleaned) {
        Some(date) => Normalized::Parsed(date.format(DATE_FORMAT).to_string()),
        None => fallback(format!("could not parse date: {cleaned}")),
    }
}

fn is_dashed_numeric(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

/// Split a tag string into an ordered list.
///
/// Brackets and quotes are removed, the rest is split on commas, entries are
/// trimmed and empty ones dropped. Duplicates are kept.
pub fn normalize_tags(raw: &str) -> Vec<String> {
    raw.chars()
        .filter(|c| !matches!(c, '[' | ']' | '"' | '\''))
        .collect::<String>()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
