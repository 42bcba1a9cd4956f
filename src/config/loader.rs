//! Configuration loading and discovery for `token-config.toml`
//!
//! The effective configuration is composed in three layers, later layers
//! winning: built-in defaults, the config file, CLI flags.

use super::schema::{FileConfig, TokenConfig};
use crate::platforms::is_known_platform;
use crate::split::FilterError;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked for during discovery.
pub const CONFIG_FILE_NAME: &str = "token-config.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parsing error
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// JSON parsing error for `.json` config files
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// includeKeys and excludeKeys are both set
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// Platform name is neither `*` nor a known platform
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override source directory (sourcePathPrefix)
    pub source: Option<PathBuf>,
    /// Override output directory (buildPathPrefix)
    pub out: Option<PathBuf>,
    /// Override fragment directory
    pub temp_dir: Option<PathBuf>,
    /// Override master token file name
    pub input_file: Option<PathBuf>,
    /// Replace the brand list
    pub brands: Option<Vec<String>>,
    /// Replace the platform list
    pub platforms: Option<Vec<String>>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// The effective configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TokenConfig,
    /// Config file that contributed, if any
    pub path: Option<PathBuf>,
    project_root: PathBuf,
}

impl LoadedConfig {
    /// Directory relative paths resolve against: the config file's directory,
    /// else the directory discovery started from.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

/// Find token-config.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find token-config.toml by walking up from a specific directory.
///
/// This is the internal implementation that allows specifying the start directory,
/// useful for testing.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Read and parse one config file; `.json` files are parsed as JSON, anything
/// else as TOML.
///
/// Keys outside the schema are ignored with a warning; the known keys still
/// apply.
pub fn load_file_layer(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

    let file: FileConfig = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&contents)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })?
    } else {
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?
    };

    for key in file.unknown_keys() {
        log::warn!("Ignoring unknown configuration key '{}' in {}", key, path.display());
    }
    Ok(file)
}

/// Load the effective configuration.
///
/// With an explicit `path`, any failure to load it is an error. Otherwise the
/// config file is discovered from `start_dir` upwards; a discovered file that
/// fails to load is skipped (logged at info level) and defaults apply.
pub fn load_config(
    path: Option<&Path>,
    start_dir: &Path,
    overrides: &CliOverrides,
) -> Result<LoadedConfig, ConfigError> {
    let (file, used_path) = match path {
        Some(p) => (Some(load_file_layer(p)?), Some(p.to_path_buf())),
        None => match find_config_from(start_dir.to_path_buf()) {
            Some(found) => match load_file_layer(&found) {
                Ok(file) => (Some(file), Some(found)),
                Err(e) => {
                    log::info!("Ignoring configuration file: {}. Using defaults.", e);
                    (None, None)
                }
            },
            None => {
                log::info!("No {} found, using defaults", CONFIG_FILE_NAME);
                (None, None)
            }
        },
    };

    let config = resolve(file, overrides)?;
    let project_root = used_path
        .as_deref()
        .and_then(project_root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start_dir.to_path_buf());
    Ok(LoadedConfig { config, path: used_path, project_root })
}

/// Compose defaults, the file layer and the CLI layer, then validate.
pub fn resolve(file: Option<FileConfig>, overrides: &CliOverrides) -> Result<TokenConfig, ConfigError> {
    let mut config = default_config();
    if let Some(file) = file {
        merge_file(&mut config, file);
    }
    merge_cli_overrides(&mut config, overrides);
    validate(&config)?;
    Ok(config)
}

/// Built-in defaults.
pub fn default_config() -> TokenConfig {
    TokenConfig::default()
}

/// Apply every field present in the file layer.
pub fn merge_file(config: &mut TokenConfig, file: FileConfig) {
    let FileConfig {
        brands,
        platforms,
        source_path_prefix,
        build_path_prefix,
        temp_dir,
        input_file,
        include_keys,
        exclude_keys,
        base_px_font_size,
        clean_temp_dir,
        uses_dtcg,
        unknown: _,
    } = file;

    if let Some(v) = brands {
        config.brands = v;
    }
    if let Some(v) = platforms {
        config.platforms = v;
    }
    if let Some(v) = source_path_prefix {
        config.source_path_prefix = v;
    }
    if let Some(v) = build_path_prefix {
        config.build_path_prefix = v;
    }
    if let Some(v) = temp_dir {
        config.temp_dir = v;
    }
    if let Some(v) = input_file {
        config.input_file = v;
    }
    if let Some(v) = include_keys {
        config.include_keys = v;
    }
    if let Some(v) = exclude_keys {
        config.exclude_keys = v;
    }
    if let Some(v) = base_px_font_size {
        config.base_px_font_size = v;
    }
    if let Some(v) = clean_temp_dir {
        config.clean_temp_dir = v;
    }
    if let Some(v) = uses_dtcg {
        config.uses_dtcg = v;
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut TokenConfig, overrides: &CliOverrides) {
    if let Some(ref source) = overrides.source {
        config.source_path_prefix = source.clone();
    }

    if let Some(ref out) = overrides.out {
        config.build_path_prefix = out.clone();
    }

    if let Some(ref temp_dir) = overrides.temp_dir {
        config.temp_dir = temp_dir.clone();
    }

    if let Some(ref input_file) = overrides.input_file {
        config.input_file = input_file.clone();
    }

    if let Some(ref brands) = overrides.brands {
        config.brands = brands.clone();
    }

    if let Some(ref platforms) = overrides.platforms {
        config.platforms = platforms.clone();
    }

    if let Some(jobs) = overrides.jobs {
        config.jobs = Some(jobs);
    }
}

/// Fail fast on configuration that can never run.
pub fn validate(config: &TokenConfig) -> Result<(), ConfigError> {
    config.key_filter().validate()?;

    if let Some(unknown) = config.platforms.iter().find(|p| !is_known_platform(p)) {
        return Err(ConfigError::UnknownPlatform(unknown.clone()));
    }

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

/// Get the project root directory from a config file path.
///
/// Returns the parent directory of the config file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
