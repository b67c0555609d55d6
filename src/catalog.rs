//! Startup catalog
//!
//! A CSV file with the columns `name,industry,url`, used to pick targets by
//! industry tag.

use crate::CatalogError;
use serde::Deserialize;
use std::path::Path;

/// One catalog row, trimmed; industry is lowercased
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    pub name: String,
    pub industry: String,
    pub url: String,
}

/// Loads the catalog at `path`
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    if !path.is_file() {
        return Err(CatalogError::NotFound(path.display().to_string()));
    }

    let read_error = |source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(read_error)?;

    reader
        .deserialize::<CatalogEntry>()
        .map(|row| {
            row.map(|entry| CatalogEntry {
                industry: entry.industry.to_lowercase(),
                ..entry
            })
            .map_err(read_error)
        })
        .collect()
}

/// URLs of the entries tagged with `industry` (case-insensitive exact match)
pub fn urls_for_industry(entries: &[CatalogEntry], industry: &str) -> Vec<String> {
    let wanted = industry.trim().to_lowercase();

    entries
        .iter()
        .filter(|e| e.industry == wanted && !e.url.is_empty())
        .map(|e| e.url.clone())
        .collect()
}
