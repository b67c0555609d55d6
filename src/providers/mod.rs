//! Provider dispatch
//!
//! Classifies a target URL as a Greenhouse board, a Lever board, or a plain
//! career page, and extracts the company slug the provider APIs are keyed on.

mod domain;

pub use domain::{extract_domain, host_key};

use url::Url;

/// Hosts serving Greenhouse job boards
pub const GREENHOUSE_HOSTS: &[&str] = &["boards.greenhouse.io", "job-boards.greenhouse.io"];

/// Hosts serving Lever job boards
pub const LEVER_HOSTS: &[&str] = &["jobs.lever.co"];

/// Which extraction strategy a target belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Greenhouse board, read through the public job board API
    Greenhouse,
    /// Lever board, read through the postings API
    Lever,
    /// Anything else, scraped for job links if robots.txt allows
    GenericHtml,
}

impl Provider {
    /// Classifies a URL by exact (case-insensitive) host match
    ///
    /// # Examples
    ///
    /// ```
    /// use hiring_radar::providers::Provider;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://boards.greenhouse.io/acme").unwrap();
    /// assert_eq!(Provider::classify(&url), Provider::Greenhouse);
    /// ```
    pub fn classify(url: &Url) -> Self {
        let Some(domain) = extract_domain(url) else {
            return Self::GenericHtml;
        };

        if GREENHOUSE_HOSTS.contains(&domain.as_str()) {
            Self::Greenhouse
        } else if LEVER_HOSTS.contains(&domain.as_str()) {
            Self::Lever
        } else {
            Self::GenericHtml
        }
    }

    /// Returns true for providers read through a documented public API
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Greenhouse | Self::Lever)
    }
}

/// Extracts the company slug: first non-empty path segment, lowercased
///
/// # Examples
///
/// ```
/// use hiring_radar::providers::slug_of;
/// use url::Url;
///
/// let url = Url::parse("https://boards.example.io/OpenAI/jobs/42").unwrap();
/// assert_eq!(slug_of(&url), Some("openai".to_string()));
///
/// let url = Url::parse("https://boards.example.io/").unwrap();
/// assert_eq!(slug_of(&url), None);
/// ```
pub fn slug_of(url: &Url) -> Option<String> {
    url.path()
        .trim_matches('/')
        .split('/')
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.to_lowercase())
}
