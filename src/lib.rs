//! Hiring-Radar: startup job listings, gathered politely
//!
//! This crate retrieves job postings from startup career sites, routing each
//! target to a provider API (Greenhouse, Lever) or a robots-gated HTML
//! fallback, then normalizes and validates the listings into one sparse
//! record schema.

pub mod catalog;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod record;
pub mod robots;
pub mod validate;

use thiserror::Error;

/// Main error type for Hiring-Radar operations
#[derive(Debug, Error)]
pub enum RadarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to serialize records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while reading the startup catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog not found: {0}")]
    NotFound(String),

    #[error("Failed to read catalog {path}: {source}")]
    Read { path: String, source: csv::Error },
}

/// A single network retrieval that did not produce a usable body
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Malformed URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Redirect error for {url}: {source}")]
    Redirect { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(reqwest::Error),

    #[error("Giving up on {url} after {attempts} attempt(s): {source}")]
    Exhausted {
        url: String,
        attempts: u32,
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Returns true for transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Status { .. } | Self::Timeout { .. }
        )
    }
}

/// Errors raised by an extraction strategy
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Malformed payload from {url}: {source}")]
    Payload {
        url: String,
        source: serde_json::Error,
    },

    #[error("All endpoints failed for {slug}: {last}")]
    AllEndpointsFailed { slug: String, last: Box<ExtractError> },

    #[error("{from} redirected to {to}, which robots.txt disallows")]
    RedirectDisallowed { from: String, to: String },
}

/// Result type alias for Hiring-Radar operations
pub type Result<T> = std::result::Result<T, RadarError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use normalize::normalize;
pub use pipeline::{Pipeline, RunReport};
pub use providers::{slug_of, Provider};
pub use record::{CanonicalRecord, RawListing, Source};
pub use validate::{validate, ValidationResult};
