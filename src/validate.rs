//! Canonical record validation

use crate::normalize::parse_date;
use crate::record::CanonicalRecord;

/// Outcome of validating one record; every violation is listed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// True when no rule was violated
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a canonical record
///
/// - `title` and `url` must be present and non-blank
/// - a present `date` must be readable
/// - a present `url` must start with `http://` or `https://`
pub fn validate(record: &CanonicalRecord) -> ValidationResult {
    let mut errors = Vec::new();

    for (name, value) in [("title", &record.title), ("url", &record.url)] {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            errors.push(format!("Missing required field: {}", name));
        }
    }

    if let Some(date) = record.date.as_deref().filter(|d| !d.is_empty()) {
        if parse_date(date).is_none() {
            errors.push(format!("Invalid date: {}", date));
        }
    }

    if let Some(url) = record.url.as_deref().filter(|u| !u.is_empty()) {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("URL must start with http(s): {}", url));
        }
    }

    ValidationResult { errors }
}
