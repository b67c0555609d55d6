//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building the shared HTTP client (connection pool)
//! - Choosing the client identity and Accept header per request kind
//! - Retry with backoff for transient failures
//! - The courtesy pause after each successful response
//! - Error classification

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::fetch::retry::{retry_with_backoff, RetryFailure, RetryPolicy};
use crate::FetchError;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// What a request is for; decides identity and Accept header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// A career page parsed for anchors
    Html,
    /// A provider API call
    Json,
    /// A site's robots.txt
    Robots,
}

impl FetchKind {
    /// Accept header sent for this kind
    pub fn accept(&self) -> &'static str {
        match self {
            Self::Html => "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            Self::Json => "application/json",
            Self::Robots => "text/plain,*/*;q=0.8",
        }
    }
}

/// The two identities the fetcher presents to remote servers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Browser-like identity for HTML pages and robots.txt
    pub browser: String,
    /// Declared identity for provider APIs
    pub api: String,
}

impl ClientIdentity {
    pub fn from_config(config: &UserAgentConfig) -> Self {
        Self {
            browser: config.browser_identity(),
            api: config.api_identity(),
        }
    }

    /// Identity sent for the given request kind
    pub fn for_kind(&self, kind: FetchKind) -> &str {
        match kind {
            FetchKind::Json => &self.api,
            FetchKind::Html | FetchKind::Robots => &self.browser,
        }
    }
}

/// Courtesy pause after a successful response: `base + U[0, jitter)`
#[derive(Debug, Clone, PartialEq)]
pub struct Politeness {
    pub base: Duration,
    pub jitter: Duration,
}

impl Politeness {
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            base: Duration::from_millis(config.politeness_delay_ms),
            jitter: Duration::from_millis(config.politeness_jitter_ms),
        }
    }

    /// Picks the next pause length
    pub fn next_delay(&self) -> Duration {
        self.base + self.jitter.mul_f64(fastrand::f64())
    }

    async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// A successfully retrieved response body
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Decoded body
    pub body: String,
}

/// Rate-limited fetcher
///
/// Cloning is cheap and clones share the underlying connection pool, which
/// is the only state shared between concurrent requests.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    identity: ClientIdentity,
    retry: RetryPolicy,
    politeness: Politeness,
}

/// Builds the shared HTTP client
///
/// The client carries no default user agent; the identity is chosen per request.
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

impl Fetcher {
    /// Creates a fetcher with its own client built from the configuration
    pub fn new(config: &FetcherConfig, identity: ClientIdentity) -> Result<Self, FetchError> {
        let client = build_http_client(config).map_err(FetchError::Client)?;
        Ok(Self::with_client(
            client,
            identity,
            RetryPolicy::from_config(config),
            Politeness::from_config(config),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(
        client: Client,
        identity: ClientIdentity,
        retry: RetryPolicy,
        politeness: Politeness,
    ) -> Self {
        Self {
            client,
            identity,
            retry,
            politeness,
        }
    }

    /// Fetches a URL with retry, then pauses politely before returning
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Malformed or non-http(s) URL | Immediate failure |
    /// | Redirect limit exceeded | Immediate failure |
    /// | Non-2xx status | Retry with backoff |
    /// | Timeout / connection error | Retry with backoff |
    ///
    /// After the last attempt the error is wrapped in `FetchError::Exhausted`
    /// carrying the final cause.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute http(s) URL to retrieve
    /// * `kind` - Decides the identity and `Accept` header sent
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - A 2xx response with its final URL and body
    /// * `Err(FetchError)` - The URL was rejected, a redirect failed, or every
    ///   attempt failed
    pub async fn fetch(&self, url: &str, kind: FetchKind) -> Result<FetchedPage, FetchError> {
        let parsed = parse_target(url)?;

        let result = retry_with_backoff(
            &self.retry,
            |_| self.attempt(parsed.clone(), kind),
            FetchError::is_retryable,
        )
        .await;

        match result {
            Ok(page) => {
                self.politeness.pause().await;
                Ok(page)
            }
            Err(RetryFailure { last, attempts }) if last.is_retryable() => {
                Err(FetchError::Exhausted {
                    url: url.to_string(),
                    attempts,
                    source: Box::new(last),
                })
            }
            Err(RetryFailure { last, .. }) => Err(last),
        }
    }

    /// One request, no retry
    async fn attempt(&self, url: Url, kind: FetchKind) -> Result<FetchedPage, FetchError> {
        let url_str = url.to_string();

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.identity.for_kind(kind))
            .header(ACCEPT, kind.accept())
            .send()
            .await
            .map_err(|e| classify_error(&url_str, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(&url_str, e))?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}

/// Parses a request target, rejecting anything but absolute http(s) URLs
fn parse_target(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Maps a transport error onto the fetch error taxonomy
fn classify_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_redirect() {
        FetchError::Redirect {
            url: url.to_string(),
            source: e,
        }
    } else if e.is_builder() {
        FetchError::Client(e)
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: e,
        }
    }
}
