//! Listing records
//!
//! A [`RawListing`] is what an extraction strategy produced, fields as loose
//! as the provider left them. A [`CanonicalRecord`] is the sparse output
//! shape: absent fields are omitted from the JSON, never written as null or
//! empty strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a listing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Greenhouse,
    Lever,
    Unknown,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greenhouse => "greenhouse",
            Self::Lever => "lever",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-shaped listing, before normalization
///
/// Every text field may be missing, empty, or padded with whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListing {
    pub title: Option<String>,
    pub url: Option<String>,
    pub location: Option<String>,
    /// Any date or timestamp text the provider offered
    pub date: Option<String>,
    pub department: Option<String>,
    pub company: Option<String>,
    pub source: Source,
}

impl RawListing {
    /// An empty listing tagged with its source
    pub fn new(source: Source) -> Self {
        Self {
            title: None,
            url: None,
            location: None,
            date: None,
            department: None,
            company: None,
            source,
        }
    }
}

/// The unified output record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    pub source: Source,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl From<&CanonicalRecord> for RawListing {
    /// Feeds a canonical record back through the normalizer
    fn from(record: &CanonicalRecord) -> Self {
        Self {
            title: record.title.clone(),
            url: record.url.clone(),
            location: record.location.clone(),
            date: record.date.clone(),
            department: record.department.clone(),
            company: record.company.clone(),
            source: record.source,
        }
    }
}
