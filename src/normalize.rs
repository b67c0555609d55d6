//! Listing normalization
//!
//! Maps any [`RawListing`] onto the canonical schema. Total and pure: no
//! input makes it fail, and equal inputs give equal outputs.

use crate::record::{CanonicalRecord, RawListing};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Ordered department table; the first category with a matching keyword wins
const DEPARTMENT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Engineering",
        &[
            "engineer",
            "ml",
            "data",
            "ios",
            "android",
            "frontend",
            "backend",
            "full stack",
        ],
    ),
    ("People/HR", &["recruit", "people", "talent", "hr"]),
    ("Marketing", &["marketing", "growth", "brand", "content"]),
    ("Product", &["product manager", "pm", "product"]),
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%Y%m%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a, %d %b %Y",
];

/// Converts a raw listing into a canonical record
///
/// - title, location, department, company and url are trimmed; empty becomes absent
/// - department falls back to a guess from the title
/// - date becomes `YYYY-MM-DD`, or absent when it cannot be read
pub fn normalize(raw: &RawListing) -> CanonicalRecord {
    let title = non_empty(raw.title.as_deref());

    let department = non_empty(raw.department.as_deref())
        .or_else(|| title.as_deref().and_then(infer_department));

    CanonicalRecord {
        department,
        location: non_empty(raw.location.as_deref()),
        date: raw.date.as_deref().and_then(normalize_date),
        url: non_empty(raw.url.as_deref()),
        source: raw.source,
        company: non_empty(raw.company.as_deref()),
        title,
    }
}

/// Guesses a department from a job title
///
/// Matching is a case-insensitive substring test, so "HR" also matches
/// inside longer words; the category order settles ties.
pub fn infer_department(title: &str) -> Option<String> {
    let lowered = title.to_lowercase();

    DEPARTMENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(department, _)| department.to_string())
}

/// Reads a date in any of the common shapes providers and pages use
///
/// Timestamps keep the calendar date of their own offset.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }

    OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(s, f).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok().map(|dt| dt.date()))
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        })
}

/// `YYYY-MM-DD` for a readable date, None otherwise
pub fn normalize_date(input: &str) -> Option<String> {
    parse_date(input).map(|d| d.format("%Y-%m-%d").to_string())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
