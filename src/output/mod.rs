//! Output module for writing the dataset and reporting on a run
//!
//! This module handles:
//! - Writing accepted records as a pretty-printed JSON array, atomically
//! - Recording and printing run statistics

pub mod stats;

pub use stats::{print_statistics, RunStatistics};

use crate::record::CanonicalRecord;
use crate::RadarError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes records to `path` as a pretty-printed JSON array
///
/// Parent directories are created as needed. The data goes to a temporary
/// file in the destination directory which is then renamed over `path`, so
/// readers never observe a half-written file.
pub fn write_records(path: &Path, records: &[CanonicalRecord]) -> Result<(), RadarError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let json = serde_json::to_string_pretty(records)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    file.flush()?;
    file.persist(path).map_err(|e| RadarError::Io(e.error))?;

    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
