//! Extraction strategies
//!
//! One capability, `extract`, implemented by three variants and selected by
//! a pure classification of the target URL:
//! - Greenhouse boards through the public job board API
//! - Lever boards through the postings API, with a legacy fallback
//! - Any other page, scraped for job-looking anchors (last resort)
//!
//! Strategies return `Result`; the pipeline collapses failures to an empty
//! listing set after logging them.

pub mod greenhouse;
pub mod html;
pub mod lever;

use crate::config::ProviderConfig;
use crate::fetch::{FetchKind, Fetcher};
use crate::providers::{host_key, slug_of, Provider};
use crate::record::RawListing;
use crate::robots::RobotsChecker;
use crate::ExtractError;
use serde::de::DeserializeOwned;
use std::fmt;
use url::Url;

/// What an extraction needs from the outside world
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    pub fetcher: &'a Fetcher,
    pub providers: &'a ProviderConfig,
    /// Consulted again when a career page redirects to another origin
    pub robots: &'a RobotsChecker,
    pub robots_token: &'a str,
}

/// A target, resolved to the strategy that reads it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Greenhouse { slug: String },
    Lever { slug: String },
    GenericHtml { page: Url },
}

impl Strategy {
    /// Picks the strategy for a target URL
    ///
    /// Returns None for a provider board URL without a company slug; such a
    /// target cannot be read and is skipped.
    pub fn select(url: &Url) -> Option<Self> {
        match Provider::classify(url) {
            Provider::Greenhouse => slug_of(url).map(|slug| Self::Greenhouse { slug }),
            Provider::Lever => slug_of(url).map(|slug| Self::Lever { slug }),
            Provider::GenericHtml => Some(Self::GenericHtml { page: url.clone() }),
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::Greenhouse { .. } => Provider::Greenhouse,
            Self::Lever { .. } => Provider::Lever,
            Self::GenericHtml { .. } => Provider::GenericHtml,
        }
    }

    /// HTML scraping is gated on robots.txt; documented APIs are not
    pub fn requires_crawl_permission(&self) -> bool {
        !self.provider().is_api()
    }

    /// `host[:port]` that this strategy sends its requests to
    ///
    /// Provider boards are read through their API host, so two board URLs
    /// on different board hosts still share one request host. The Lever
    /// legacy endpoint is only tried after the primary one within the same
    /// target, so Lever is keyed on the primary API host.
    pub fn request_host_key(&self, providers: &ProviderConfig) -> Option<String> {
        let base = match self {
            Self::Greenhouse { .. } => Url::parse(&providers.greenhouse_api).ok()?,
            Self::Lever { .. } => Url::parse(&providers.lever_api).ok()?,
            Self::GenericHtml { page } => return host_key(page),
        };
        host_key(&base)
    }

    /// Retrieves the raw listings for this target
    pub async fn extract(&self, ctx: ExtractContext<'_>) -> Result<Vec<RawListing>, ExtractError> {
        match self {
            Self::Greenhouse { slug } => {
                greenhouse::extract(ctx.fetcher, &ctx.providers.greenhouse_api, slug).await
            }
            Self::Lever { slug } => lever::extract(ctx.fetcher, ctx.providers, slug).await,
            Self::GenericHtml { page } => {
                html::extract(ctx.fetcher, ctx.robots, ctx.robots_token, page).await
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greenhouse { slug } => write!(f, "greenhouse API (slug '{}')", slug),
            Self::Lever { slug } => write!(f, "lever API (slug '{}')", slug),
            Self::GenericHtml { page } => write!(f, "generic HTML ({})", page),
        }
    }
}

/// Fetches a provider endpoint and decodes its JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    fetcher: &Fetcher,
    url: &str,
) -> Result<T, ExtractError> {
    let page = fetcher.fetch(url, FetchKind::Json).await?;
    serde_json::from_str(&page.body).map_err(|source| ExtractError::Payload {
        url: url.to_string(),
        source,
    })
}

/// Decodes one provider item, falling back to an empty item when its shape is off
pub(crate) fn lenient<T: DeserializeOwned + Default>(value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

/// Joins an API base and a path without doubling the separator
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// First non-blank value among the candidates
pub(crate) fn first_present(candidates: &[Option<&String>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
}

/// Display name derived from a slug: first letter of each word uppercased
///
/// Words are runs of letters, so `open-ai` becomes `Open-Ai`.
pub fn company_from_slug(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut at_word_start = true;

    for c in slug.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
