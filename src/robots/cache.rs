//! Robots.txt caching implementation
//!
//! Policies are cached per origin, including the outcome "no usable
//! policy", and expire after 24 hours.

use crate::robots::ParsedRobots;
use chrono::{DateTime, Duration, Utc};

/// What was learned from an origin's robots.txt
#[derive(Debug, Clone)]
pub enum RobotsPolicy {
    /// A policy was fetched and parsed
    Parsed(ParsedRobots),
    /// Fetching or parsing failed; everything on the origin is denied
    Unavailable,
}

/// Cached robots.txt data for an origin
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The policy, or its absence
    pub policy: RobotsPolicy,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    /// Creates a new CachedRobots stamped with the current time
    pub fn new(policy: RobotsPolicy) -> Self {
        Self {
            policy,
            fetched_at: Utc::now(),
        }
    }

    /// Checks if the cached robots.txt is older than 24 hours
    pub fn is_stale(&self) -> bool {
        self.age() > Duration::hours(24)
    }

    /// Returns the age of the cached robots.txt
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    /// Checks if a URL is allowed by the cached policy
    ///
    /// # Arguments
    ///
    /// * `url` - An absolute URL or a path
    /// * `user_agent` - The product token to match against `User-agent` lines
    ///
    /// # Returns
    ///
    /// * `true` - The parsed policy allows the URL
    /// * `false` - The policy disallows it, or no usable policy was found
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match &self.policy {
            RobotsPolicy::Parsed(robots) => robots.is_allowed(url, user_agent),
            RobotsPolicy::Unavailable => false,
        }
    }

    /// Gets the crawl delay in seconds, if the policy declares one
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        match &self.policy {
            RobotsPolicy::Parsed(robots) => robots.crawl_delay(user_agent),
            RobotsPolicy::Unavailable => None,
        }
    }
}
