//! Fragment discovery for the build stage.
//!
//! Finds the JSON fragments the splitter left in the temp directory.
//! `.json5` fragments placed there by hand are picked up too.

use glob::{glob, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions treated as token fragments.
pub const FRAGMENT_EXTENSIONS: &[&str] = &["json", "json5"];

/// Error during fragment discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Invalid glob pattern
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    /// A stale fragment could not be removed
    #[error("Failed to remove {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Files in `dir` matching `*.<extension>`, sorted.
fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let pattern = format!("{}/*.{}", Pattern::escape(&dir.to_string_lossy()), extension);
    let paths = glob(&pattern)
        .map_err(|source| DiscoveryError::InvalidPattern { pattern: pattern.clone(), source })?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("Error reading path: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

/// Discover token fragments in `dir`, sorted by path.
///
/// A missing directory yields an empty list; the caller decides whether that
/// is an error.
pub fn discover_fragments(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut fragments = Vec::new();
    for extension in FRAGMENT_EXTENSIONS {
        fragments.extend(files_with_extension(dir, extension)?);
    }
    fragments.sort();
    log::debug!("Discovered {} fragment(s) in {}", fragments.len(), dir.display());
    Ok(fragments)
}

/// Remove fragments left over from a previous run.
///
/// Returns the number of files removed.
pub fn clean_fragments(dir: &Path) -> Result<usize, DiscoveryError> {
    let stale = discover_fragments(dir)?;
    for path in &stale {
        fs::remove_file(path).map_err(|source| DiscoveryError::Io { path: path.clone(), source })?;
    }
    if !stale.is_empty() {
        log::info!("Removed {} stale fragment(s) from {}", stale.len(), dir.display());
    }
    Ok(stale.len())
}
