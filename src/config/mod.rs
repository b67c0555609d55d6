//! Configuration module for Hiring-Radar
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file is the common case.
//!
//! # Example
//!
//! ```no_run
//! use hiring_radar::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("radar.toml")).unwrap();
//! println!("Per-site cap: {}", config.output.max_per_site);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CatalogConfig, Config, FetcherConfig, OutputConfig, ProviderConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
