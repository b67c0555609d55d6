//! Robots.txt handling module
//!
//! Consulted before any generic-HTML fetch. API-backed providers bypass it.
//! Failure is never fail-open: if a site's robots.txt cannot be fetched or
//! parsed, nothing on that site may be fetched.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsPolicy};
pub use parser::{ParsedRobots, RobotsParseError};

use crate::fetch::{FetchKind, Fetcher};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Derives `{scheme}://{host}[:port]/robots.txt` for a URL
///
/// Returns None for URLs without a host.
pub fn robots_url(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let origin = match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    };
    Some(format!("{}/robots.txt", origin))
}

/// Crawl-permission checker with a per-origin policy cache
#[derive(Debug)]
pub struct RobotsChecker {
    fetcher: Fetcher,
    cache: Mutex<HashMap<String, CachedRobots>>,
}

impl RobotsChecker {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true if `user_agent` may fetch exactly `url`
    ///
    /// The origin's robots.txt is fetched on first use and cached for 24
    /// hours, including the outcome that no usable policy exists.
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL about to be fetched
    /// * `user_agent` - Product token matched against `User-agent` lines
    ///
    /// # Returns
    ///
    /// * `true` - The policy allows the URL
    /// * `false` - The policy disallows it, the URL has no host, or the
    ///   robots.txt could not be fetched or parsed
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn demo(checker: hiring_radar::robots::RobotsChecker) {
    /// if checker.can_fetch("https://acme.io/careers", "StartupHiringRadar").await {
    ///     // fetch the page
    /// }
    /// # }
    /// ```
    pub async fn can_fetch(&self, url: &str, user_agent: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            tracing::debug!("Cannot derive robots.txt location for {}", url);
            return false;
        };
        let Some(robots_location) = robots_url(&parsed) else {
            return false;
        };

        let cached = self.policy_for(&robots_location).await;
        cached.is_allowed(url, user_agent)
    }

    /// Crawl-delay declared for `user_agent` on the origin of `url`
    ///
    /// Only answers from the cache; call `can_fetch` first.
    pub fn crawl_delay(&self, url: &str, user_agent: &str) -> Option<Duration> {
        let parsed = Url::parse(url).ok()?;
        let location = robots_url(&parsed)?;
        let cache = self.cache.lock().ok()?;
        let seconds = cache.get(&location)?.crawl_delay(user_agent)?;

        if seconds.is_finite() && seconds > 0.0 {
            Some(Duration::from_secs_f64(seconds))
        } else {
            None
        }
    }

    /// Returns the cached policy for an origin, fetching it when absent or stale
    async fn policy_for(&self, robots_location: &str) -> CachedRobots {
        if let Ok(cache) = self.cache.lock() {
            if let Some(cached) = cache.get(robots_location).filter(|c| !c.is_stale()) {
                return cached.clone();
            }
        }

        let cached = CachedRobots::new(self.fetch_policy(robots_location).await);

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(robots_location.to_string(), cached.clone());
        }

        cached
    }

    async fn fetch_policy(&self, robots_location: &str) -> RobotsPolicy {
        let page = match self.fetcher.fetch(robots_location, FetchKind::Robots).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Could not fetch {}: {} (denying)", robots_location, e);
                return RobotsPolicy::Unavailable;
            }
        };

        match ParsedRobots::parse(&page.body) {
            Ok(robots) => RobotsPolicy::Parsed(robots),
            Err(e) => {
                tracing::warn!("Could not parse {}: {} (denying)", robots_location, e);
                RobotsPolicy::Unavailable
            }
        }
    }
}
