//! Configuration schema types for `token-config.toml`
//!
//! [`TokenConfig`] is the effective configuration with every field filled in.
//! [`FileConfig`] is the config-file layer: every field optional, unknown keys
//! collected so they can be reported and ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::split::KeyFilter;

/// Effective configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    /// Brands to build; each gets its own output directory
    pub brands: Vec<String>,
    /// Platforms to build; `*` selects all of them
    pub platforms: Vec<String>,
    /// Directory holding the master token file
    pub source_path_prefix: PathBuf,
    /// Root of the generated outputs
    pub build_path_prefix: PathBuf,
    /// Directory receiving the split fragments
    pub temp_dir: PathBuf,
    /// Master token file name, relative to `source_path_prefix`
    pub input_file: PathBuf,
    pub include_keys: Vec<String>,
    pub exclude_keys: Vec<String>,
    /// Root font size for px/rem conversions
    pub base_px_font_size: f64,
    /// Remove stale fragments from `temp_dir` before splitting
    pub clean_temp_dir: bool,
    /// Read DTCG `$value`/`$type` keys rather than `value`/`type`
    pub uses_dtcg: bool,
    /// Worker threads for the build phase (CLI only)
    #[serde(skip)]
    pub jobs: Option<usize>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            brands: vec!["dxn-default".to_string(), "zrh-default".to_string()],
            platforms: vec!["css".to_string(), "js".to_string(), "json".to_string()],
            source_path_prefix: PathBuf::from("input"),
            build_path_prefix: PathBuf::from("build"),
            temp_dir: PathBuf::from("temp"),
            input_file: PathBuf::from("design-tokens.json"),
            include_keys: Vec::new(),
            exclude_keys: Vec::new(),
            base_px_font_size: 16.0,
            clean_temp_dir: false,
            uses_dtcg: true,
            jobs: None,
        }
    }
}

impl TokenConfig {
    /// Path of the master token file, before project-root resolution.
    pub fn input_path(&self) -> PathBuf {
        self.source_path_prefix.join(&self.input_file)
    }

    /// Key filter for the splitter.
    pub fn key_filter(&self) -> KeyFilter {
        KeyFilter { include_keys: self.include_keys.clone(), exclude_keys: self.exclude_keys.clone() }
    }

    /// Check field-level rules that do not have a dedicated error.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.brands.is_empty() {
            errors.push(ConfigValidationError {
                field: "brands".to_string(),
                message: "must list at least one brand".to_string(),
            });
        }
        if self.brands.iter().any(|b| b.trim().is_empty() || Path::new(b).components().count() != 1) {
            errors.push(ConfigValidationError {
                field: "brands".to_string(),
                message: "brand names must be non-empty single path segments".to_string(),
            });
        }

        if self.platforms.is_empty() {
            errors.push(ConfigValidationError {
                field: "platforms".to_string(),
                message: "must list at least one platform".to_string(),
            });
        }

        if !(self.base_px_font_size.is_finite() && self.base_px_font_size > 0.0) {
            errors.push(ConfigValidationError {
                field: "basePxFontSize".to_string(),
                message: "must be a positive number".to_string(),
            });
        }

        if self.jobs == Some(0) {
            errors.push(ConfigValidationError {
                field: "jobs".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }
}

/// Config-file layer. Absent fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub brands: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
    pub source_path_prefix: Option<PathBuf>,
    pub build_path_prefix: Option<PathBuf>,
    #[serde(alias = "outputDir")]
    pub temp_dir: Option<PathBuf>,
    pub input_file: Option<PathBuf>,
    pub include_keys: Option<Vec<String>>,
    pub exclude_keys: Option<Vec<String>>,
    pub base_px_font_size: Option<f64>,
    pub clean_temp_dir: Option<bool>,
    pub uses_dtcg: Option<bool>,
    /// Keys that are not part of the schema; never applied
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

impl FileConfig {
    /// Names of the keys that will be ignored.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.unknown.keys().map(String::as_str)
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
