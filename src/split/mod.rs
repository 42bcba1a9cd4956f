//! Token splitting
//!
//! Partitions a master token document by its top-level keys and writes one
//! JSON fragment per selected key. Keys starting with `$` (`$themes`,
//! `$metadata`, ...) are document metadata and never become fragments.
//!
//! # Example
//!
//! ```ignore
//! use tokenpipe::split::{split_tokens, KeyFilter};
//!
//! let outcome = split_tokens(
//!     Path::new("input/design-tokens.json"),
//!     Path::new("temp"),
//!     &KeyFilter::include(["Themes/ZRH", "Themes/DXN"]),
//! )?;
//! println!("wrote {} fragments", outcome.files.len());
//! ```

pub mod filter;

pub use filter::*;

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal splitting errors. Per-key problems are warnings, see [`SplitOutcome`].
#[derive(Debug, Error)]
pub enum SplitError {
    /// Conflicting include/exclude configuration
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// Output directory could not be created
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDirUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Input file does not exist
    #[error("Design tokens file not found at: {}", .0.display())]
    InputFileNotFound(PathBuf),
    /// Input file exists but could not be read
    #[error("Error reading design tokens file {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Input file is not valid JSON
    #[error("Invalid JSON in design tokens file {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Input parsed but its root is not an object
    #[error("Design tokens file {} must contain a JSON object at the top level", .0.display())]
    NotAnObject(PathBuf),
    /// None of the requested include keys exist
    #[error("None of the requested include keys exist in the tokens file.")]
    NoMatchingKeys,
    /// The exclude list removes every key
    #[error("All top-level keys would be excluded by the current excludeKeys configuration.")]
    AllKeysExcluded,
    /// Two keys sanitize to the same fragment file name
    #[error("Keys {} map to the same fragment file '{file}'", keys.iter().map(|k| format!("\"{}\"", k)).collect::<Vec<_>>().join(" and "))]
    DuplicateFragmentName { file: String, keys: Vec<String> },
    /// Nothing was written after processing every key
    #[error("No token files were generated. Check your configuration.")]
    NoFilesGenerated,
}

/// Result of a successful split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Fragment files written, in processing order
    pub files: Vec<PathBuf>,
    /// Non-fatal problems (missing include keys, non-object groups, failed writes)
    pub warnings: Vec<String>,
}

/// Whether a top-level key is document metadata rather than a token group.
pub fn is_metadata_key(key: &str) -> bool {
    key.starts_with('$')
}

/// Fragment file name for a top-level key: every `/` becomes `_`.
///
/// ```
/// use tokenpipe::split::fragment_file_name;
///
/// assert_eq!(fragment_file_name("Themes/ZRH"), "Themes_ZRH.json");
/// ```
pub fn fragment_file_name(key: &str) -> String {
    format!("{}.json", key.replace('/', "_"))
}

/// Split `input_file` into per-key fragments under `output_dir`.
///
/// The filter is validated before any filesystem access, so a conflicting
/// filter never creates directories or files.
pub fn split_tokens(
    input_file: &Path,
    output_dir: &Path,
    filter: &KeyFilter,
) -> Result<SplitOutcome, SplitError> {
    filter.validate()?;

    log::debug!("Splitting design tokens from {}", input_file.display());

    fs::create_dir_all(output_dir).map_err(|source| SplitError::OutputDirUnavailable {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let document = read_document(input_file)?;
    split_document(&document, output_dir, filter)
}

/// Read and parse the master token document.
fn read_document(input_file: &Path) -> Result<Map<String, Value>, SplitError> {
    let contents = fs::read_to_string(input_file).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SplitError::InputFileNotFound(input_file.to_path_buf())
        } else {
            SplitError::InputUnreadable { path: input_file.to_path_buf(), source }
        }
    })?;

    let value: Value = serde_json::from_str(&contents).map_err(|source| {
        SplitError::InvalidJson { path: input_file.to_path_buf(), source }
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SplitError::NotAnObject(input_file.to_path_buf())),
    }
}

/// Split an already-parsed document into `output_dir`, which must exist.
pub fn split_document(
    document: &Map<String, Value>,
    output_dir: &Path,
    filter: &KeyFilter,
) -> Result<SplitOutcome, SplitError> {
    filter.validate()?;

    let mut outcome = SplitOutcome::default();
    let top_level_keys: Vec<&str> =
        document.keys().map(String::as_str).filter(|k| !is_metadata_key(k)).collect();

    log::debug!("Found {} top-level keys in the tokens file", top_level_keys.len());

    let keys_to_process = select_keys(&top_level_keys, filter, &mut outcome.warnings)?;

    // Groups that will actually be written; anything else is skipped with a warning
    let mut groups: Vec<(&str, &Value)> = Vec::with_capacity(keys_to_process.len());
    for key in keys_to_process {
        match document.get(key) {
            Some(value @ Value::Object(_)) => groups.push((key, value)),
            _ => outcome
                .warnings
                .push(format!("Key \"{}\" has invalid or empty content. Skipping.", key)),
        }
    }

    check_fragment_names(&groups)?;

    for (key, value) in groups {
        let path = output_dir.join(fragment_file_name(key));
        match write_fragment(&path, value) {
            Ok(()) => {
                log::debug!("Created {}", path.display());
                outcome.files.push(path);
            }
            Err(e) => outcome
                .warnings
                .push(format!("Failed to write file for key \"{}\": {}", key, e)),
        }
    }

    for warning in &outcome.warnings {
        log::warn!("{}", warning);
    }

    if outcome.files.is_empty() {
        return Err(SplitError::NoFilesGenerated);
    }

    Ok(outcome)
}

/// Apply the include/exclude rule to the document's top-level keys.
fn select_keys<'a>(
    top_level_keys: &[&'a str],
    filter: &'a KeyFilter,
    warnings: &mut Vec<String>,
) -> Result<Vec<&'a str>, SplitError> {
    if !filter.include_keys.is_empty() {
        let missing: Vec<&str> = filter
            .include_keys
            .iter()
            .map(String::as_str)
            .filter(|k| !top_level_keys.contains(k))
            .collect();
        if !missing.is_empty() {
            warnings.push(format!(
                "The following requested keys do not exist in the tokens file: {}",
                missing.join(", ")
            ));
        }

        let mut selected: Vec<&str> = Vec::with_capacity(filter.include_keys.len());
        for key in filter.include_keys.iter().map(String::as_str) {
            if top_level_keys.contains(&key) && !selected.contains(&key) {
                selected.push(key);
            }
        }
        if selected.is_empty() {
            return Err(SplitError::NoMatchingKeys);
        }
        return Ok(selected);
    }

    if !filter.exclude_keys.is_empty() {
        let remaining: Vec<&str> = top_level_keys
            .iter()
            .copied()
            .filter(|k| !filter.exclude_keys.iter().any(|e| e.as_str() == *k))
            .collect();
        if remaining.is_empty() {
            return Err(SplitError::AllKeysExcluded);
        }
        return Ok(remaining);
    }

    Ok(top_level_keys.to_vec())
}

/// Reject key sets where two groups would land in the same fragment file.
fn check_fragment_names(groups: &[(&str, &Value)]) -> Result<(), SplitError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for &(key, _) in groups {
        let file = fragment_file_name(key);
        if let Some(&previous) = seen.get(&file) {
            return Err(SplitError::DuplicateFragmentName {
                file,
                keys: vec![previous.to_string(), key.to_string()],
            });
        } else {
            seen.insert(file, key);
        }
    }
    Ok(())
}

fn write_fragment(path: &Path, value: &Value) -> io::Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    #[test]
    fn test_metadata_keys_are_never_split() {
        let temp = TempDir::new().unwrap();
        let document = doc(json!({
            "$themes": [],
            "$metadata": { "tokenSetOrder": ["global"] },
            "$custom": { "a": 1 },
            "global": { "a": 1 }
        }));

        let outcome = split_document(&document, temp.path(), &KeyFilter::all()).unwrap();
        assert_eq!(outcome.files, vec![temp.path().join("global.json")]);
    }

    #[test]
    fn test_include_metadata_key_does_not_match() {
        let temp = TempDir::new().unwrap();
        let document = doc(json!({ "$themes": { "x": 1 }, "global": { "a": 1 } }));

        let result = split_document(&document, temp.path(), &KeyFilter::include(["$themes"]));
        assert!(matches!(result, Err(SplitError::NoMatchingKeys)));
    }

    #[test]
    fn test_include_preserves_requested_order() {
        let temp = TempDir::new().unwrap();
        let document = doc(json!({ "a": {}, "b": {}, "c": {} }));

        let outcome =
            split_document(&document, temp.path(), &KeyFilter::include(["c", "a"])).unwrap();
        assert_eq!(outcome.files, vec![temp.path().join("c.json"), temp.path().join("a.json")]);
    }

    #[test]
    fn test_repeated_include_key_written_once() {
        let temp = TempDir::new().unwrap();
        let document = doc(json!({ "a": { "x": 1 }, "b": { "y": 2 } }));

        let outcome =
            split_document(&document, temp.path(), &KeyFilter::include(["a", "b", "a"])).unwrap();
        assert_eq!(outcome.files, vec![temp.path().join("a.json"), temp.path().join("b.json")]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_include_partial_miss_warns() {
        let temp = TempDir::new().unwrap();
        let document = doc(json!({ "a": {} }));

        let outcome =
            split_document(&document, temp.path(), &KeyFilter::include(["a", "missing"])).unwrap();
        assert_eq!(outcome.files.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("missing"));
    }

    #[test]
    fn test_exclude_removes_keys() {
        let temp = TempDir::new().unwrap();
        let document = doc(json!({ "global": {}, "Themes/ZRH": {}, "Themes/DXN": {} }));

        let outcome =
            split_document(&document, temp.path(), &KeyFilter::exclude(["global"])).unwrap();
        assert_eq!(
            outcome.files,
            vec![temp.path().join("Themes_ZRH.json"), temp.path().join("Themes_DXN.json")]
        );
        assert!(!temp.path().join("global.json").exists());
    }

    #[test]
    fn test_non_object_groups_are_skipped() {
        let temp = TempDir::new().unwrap();
        let document = doc(json!({ "a": "string", "b": [1, 2], "c": { "ok": true } }));

        let outcome = split_document(&document, temp.path(), &KeyFilter::all()).unwrap();
        assert_eq!(outcome.files, vec![temp.path().join("c.json")]);
        assert_eq!(outcome.warnings.len(), 2);
    }

    #[test]
    fn test_duplicate_fragment_name_fails_before_writing() {
        let temp = TempDir::new().unwrap();
        let document = doc(json!({ "first": {}, "a/b": { "x": 1 }, "a_b": { "y": 2 } }));

        let result = split_document(&document, temp.path(), &KeyFilter::all());
        match result {
            Err(SplitError::DuplicateFragmentName { file, keys }) => {
                assert_eq!(file, "a_b.json");
                assert_eq!(keys, vec!["a/b".to_string(), "a_b".to_string()]);
            }
            other => panic!("expected DuplicateFragmentName, got {:?}", other),
        }
        assert!(!temp.path().join("first.json").exists());
    }

    #[test]
    fn test_collision_with_skipped_group_is_fine() {
        let temp = TempDir::new().unwrap();
        let document = doc(json!({ "a/b": "not a group", "a_b": { "y": 2 } }));

        let outcome = split_document(&document, temp.path(), &KeyFilter::all()).unwrap();
        assert_eq!(outcome.files, vec![temp.path().join("a_b.json")]);
    }

    #[test]
    fn test_fragment_keeps_key_order() {
        let temp = TempDir::new().unwrap();
        let document = doc(json!({ "g": { "zeta": 1, "alpha": 2, "mid": 3 } }));

        split_document(&document, temp.path(), &KeyFilter::all()).unwrap();
        let written = fs::read_to_string(temp.path().join("g.json")).unwrap();
        let zeta = written.find("zeta").unwrap();
        let alpha = written.find("alpha").unwrap();
        let mid = written.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_fragment_name_sanitizes_every_slash() {
        assert_eq!(fragment_file_name("a/b/c"), "a_b_c.json");
        assert_eq!(fragment_file_name("plain"), "plain.json");
    }
}
