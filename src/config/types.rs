use serde::Deserialize;

/// Main configuration structure for Hiring-Radar
///
/// Every section is optional in the TOML file; missing keys take the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub providers: ProviderConfig,
    pub output: OutputConfig,
    pub catalog: CatalogConfig,
}

/// Network retrieval behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Per-attempt request timeout (seconds)
    pub timeout_secs: u64,

    /// Total attempts per request, including the first
    pub max_attempts: u32,

    /// First retry wait (milliseconds), doubled on each further attempt
    pub backoff_base_ms: u64,

    /// Upper bound on a single retry wait (milliseconds)
    pub backoff_cap_ms: u64,

    /// Random jitter added to each retry wait (milliseconds)
    pub backoff_jitter_ms: u64,

    /// Courtesy pause after every successful response (milliseconds)
    pub politeness_delay_ms: u64,

    /// Random extra pause added to the courtesy pause (milliseconds)
    pub politeness_jitter_ms: u64,

    /// Redirect hops followed before the request fails
    pub max_redirects: usize,

    /// Distinct hosts processed at the same time
    pub max_concurrent_hosts: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            max_attempts: 3,
            backoff_base_ms: 1_000,
            backoff_cap_ms: 10_000,
            backoff_jitter_ms: 1_000,
            politeness_delay_ms: 1_000,
            politeness_jitter_ms: 1_000,
            max_redirects: 10,
            max_concurrent_hosts: 1,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler, also the robots.txt product token
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "StartupHiringRadar".to_string(),
            crawler_version: "0.1".to_string(),
            contact_url: "https://example.com/hiring-radar".to_string(),
            contact_email: "your-email@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Identity declared to provider APIs
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn api_identity(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }

    /// Browser-like identity used for career pages and robots.txt
    pub fn browser_identity(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }

    /// Token matched against robots.txt `User-agent` groups
    pub fn robots_token(&self) -> &str {
        &self.crawler_name
    }
}

/// Provider API endpoint bases
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProviderConfig {
    pub greenhouse_api: String,
    pub lever_api: String,
    pub lever_legacy_api: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            greenhouse_api: "https://boards-api.greenhouse.io".to_string(),
            lever_api: "https://api.lever.co".to_string(),
            lever_legacy_api: "https://jobs.lever.co".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the JSON dataset
    pub path: String,

    /// Safety cap on listings taken from a single site
    pub max_per_site: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "data/output.json".to_string(),
            max_per_site: 500,
        }
    }
}

/// Startup catalog location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "data/startups.csv".to_string(),
        }
    }
}
