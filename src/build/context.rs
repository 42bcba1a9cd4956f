//! Build context containing configuration and state for a run.

use crate::config::{resolve_path, TokenConfig};
use crate::engine::EngineOptions;
use std::path::{Path, PathBuf};

/// Build context containing configuration and paths for a run.
///
/// Every relative path in the configuration resolves against the project
/// root (the directory of the config file, else the working directory).
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The effective configuration
    config: TokenConfig,
    /// Project root directory
    project_root: PathBuf,
    /// Whether to run in verbose mode
    verbose: bool,
    /// Plan targets without touching the filesystem
    dry_run: bool,
    /// Optional filter to build specific targets only
    target_filter: Option<Vec<String>>,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(config: TokenConfig, project_root: PathBuf) -> Self {
        Self { config, project_root, verbose: false, dry_run: false, target_filter: None }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Master token file (resolved to absolute path).
    pub fn input_file(&self) -> PathBuf {
        self.resolve_path(&self.config.input_path())
    }

    /// Fragment directory (resolved to absolute path).
    pub fn temp_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.temp_dir)
    }

    /// Output root (resolved to absolute path).
    pub fn build_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.build_path_prefix)
    }

    /// Worker threads for the build phase.
    pub fn jobs(&self) -> usize {
        self.config
            .jobs
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1)
    }

    /// Engine settings derived from the configuration.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            base_px_font_size: self.config.base_px_font_size,
            uses_dtcg: self.config.uses_dtcg,
        }
    }

    /// Whether verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether this is a dry run.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set target filter to build only specific targets.
    pub fn with_filter(mut self, targets: Vec<String>) -> Self {
        self.target_filter = Some(targets);
        self
    }

    /// Get the target filter.
    pub fn target_filter(&self) -> Option<&[String]> {
        self.target_filter.as_deref()
    }

    /// Resolve a path relative to the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        resolve_path(&self.project_root, path)
    }
}
