//! Build pipeline orchestration.
//!
//! One run moves through fixed stages:
//!
//! `Start -> ConfigResolved -> TokensSplit -> FragmentsDiscovered -> BrandsBuilt -> Done`
//!
//! Any step can fail, which leaves the pipeline in [`Stage::Failed`] and
//! returns a [`PipelineError`] naming the stage that was being entered.

use crate::build::{
    clean_fragments, create_build_plan, discover_fragments, BuildContext, BuildResult,
    DiscoveryError, NullProgress, ParallelBuild, ProgressEvent, ProgressReporter, TargetResult,
};
use crate::config::{load_config, CliOverrides, ConfigError};
use crate::engine::{DictionaryEngine, EngineError, TokenEngine};
use crate::registry::Registry;
use crate::split::{split_tokens, SplitError};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ConfigResolved,
    TokensSplit,
    FragmentsDiscovered,
    BrandsBuilt,
    Done,
    Failed,
}

impl Stage {
    /// Machine-readable name, used by the JSON reporter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::ConfigResolved => "config_resolved",
            Stage::TokensSplit => "tokens_split",
            Stage::FragmentsDiscovered => "fragments_discovered",
            Stage::BrandsBuilt => "brands_built",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }

    /// Prefix for errors raised while entering this stage.
    fn failure_label(&self) -> &'static str {
        match self {
            Stage::ConfigResolved => "Configuration failed",
            Stage::TokensSplit => "Token splitting failed",
            Stage::FragmentsDiscovered => "Fragment discovery failed",
            Stage::BrandsBuilt => "Build failed",
            _ => "Pipeline failed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Stage::Start => "Start",
            Stage::ConfigResolved => "Configuration resolved",
            Stage::TokensSplit => "Tokens split",
            Stage::FragmentsDiscovered => "Fragments discovered",
            Stage::BrandsBuilt => "Brands built",
            Stage::Done => "Done",
            Stage::Failed => "Failed",
        };
        write!(f, "{}", label)
    }
}

/// Error during a pipeline stage.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration could not be resolved
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Splitting the master file failed
    #[error(transparent)]
    Split(#[from] SplitError),
    /// Fragment enumeration or cleanup failed
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// The temp directory holds no fragments
    #[error("No token fragments found in {}. Check your configuration.", .0.display())]
    NoFragments(PathBuf),
    /// Fragments could not be loaded
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// A brand x platform pair failed
    #[error("Error building platform '{platform}' for brand '{brand}': {source}")]
    PlatformBuildFailed {
        brand: String,
        platform: String,
        #[source]
        source: EngineError,
    },
    /// The worker pool could not be created
    #[error("Failed to start build workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A [`BuildError`] tagged with the stage it interrupted.
#[derive(Debug, Error)]
#[error("{}: {source}", .stage.failure_label())]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: BuildError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<BuildError>) -> Self {
        Self { stage, source: source.into() }
    }
}

/// Build pipeline for one run.
pub struct Pipeline {
    config_path: Option<PathBuf>,
    /// Where config discovery starts; also the project root without a config file
    start_dir: PathBuf,
    overrides: CliOverrides,
    reporter: Box<dyn ProgressReporter>,
    verbose: bool,
    dry_run: bool,
    split_only: bool,
    target_filter: Vec<String>,
    stage: Stage,
}

impl Pipeline {
    /// Create a pipeline that discovers its configuration from `start_dir`.
    pub fn new(start_dir: PathBuf, overrides: CliOverrides) -> Self {
        Self {
            config_path: None,
            start_dir,
            overrides,
            reporter: Box::new(NullProgress),
            verbose: false,
            dry_run: false,
            split_only: false,
            target_filter: Vec::new(),
            stage: Stage::Start,
        }
    }

    /// Use an explicit config file; failing to load it is fatal.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Set the progress reporter.
    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set dry-run mode (resolve and plan only).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop after the split stage.
    pub fn with_split_only(mut self, split_only: bool) -> Self {
        self.split_only = split_only;
        self
    }

    /// Build only targets matching these patterns.
    pub fn with_filter(mut self, targets: Vec<String>) -> Self {
        self.target_filter = targets;
        self
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run the pipeline to completion.
    pub fn run(&mut self) -> Result<BuildResult, PipelineError> {
        let start = Instant::now();
        self.stage = Stage::Start;

        match self.execute() {
            Ok(result) => {
                self.stage = Stage::Done;
                Ok(result.with_duration(start.elapsed()))
            }
            Err(e) => {
                log::debug!("Pipeline failed at {:?}: {}", e.stage, e);
                self.stage = Stage::Failed;
                self.reporter.report(ProgressEvent::Error { target_id: None, message: e.to_string() });
                Err(e)
            }
        }
    }

    fn advance(&mut self, stage: Stage, detail: String) {
        log::info!("{}{}", stage, if detail.is_empty() { String::new() } else { format!(": {}", detail) });
        self.stage = stage;
        self.reporter.report(ProgressEvent::StageCompleted { stage, detail });
    }

    fn warn(&self, result: &mut BuildResult, message: String) {
        self.reporter.report(ProgressEvent::Warning { target_id: None, message: message.clone() });
        result.warnings.push(message);
    }

    fn resolve_context(&self) -> Result<BuildContext, ConfigError> {
        let loaded = load_config(self.config_path.as_deref(), &self.start_dir, &self.overrides)?;
        let project_root = loaded.project_root().to_path_buf();
        let mut ctx = BuildContext::new(loaded.config, project_root)
            .with_verbose(self.verbose)
            .with_dry_run(self.dry_run);
        if !self.target_filter.is_empty() {
            ctx = ctx.with_filter(self.target_filter.clone());
        }
        Ok(ctx)
    }

    fn execute(&mut self) -> Result<BuildResult, PipelineError> {
        let ctx = self.resolve_context().map_err(|e| PipelineError::new(Stage::ConfigResolved, e))?;
        self.advance(Stage::ConfigResolved, ctx.input_file().display().to_string());

        let mut result = BuildResult::new();
        if ctx.is_dry_run() {
            for target in create_build_plan(&ctx).targets() {
                result.add_result(TargetResult::planned(target.id.clone()));
            }
            return Ok(result);
        }

        // Split
        let temp_dir = ctx.temp_dir();
        if ctx.config().clean_temp_dir {
            clean_fragments(&temp_dir).map_err(|e| PipelineError::new(Stage::TokensSplit, e))?;
        }
        let outcome = split_tokens(&ctx.input_file(), &temp_dir, &ctx.config().key_filter())
            .map_err(|e| PipelineError::new(Stage::TokensSplit, e))?;
        for warning in outcome.warnings {
            self.warn(&mut result, warning);
        }
        result.fragments = outcome.files;
        self.advance(Stage::TokensSplit, format!("{} fragment(s) in {}", result.fragments.len(), temp_dir.display()));

        if self.split_only {
            return Ok(result);
        }

        // Discover
        let fragments = discover_fragments(&temp_dir)
            .map_err(|e| PipelineError::new(Stage::FragmentsDiscovered, e))?;
        if fragments.is_empty() {
            return Err(PipelineError::new(Stage::FragmentsDiscovered, BuildError::NoFragments(temp_dir)));
        }
        self.advance(Stage::FragmentsDiscovered, format!("{} fragment(s)", fragments.len()));

        // Build
        let registry = Registry::builtin();
        let engine = DictionaryEngine::new(ctx.engine_options());
        let source = engine.load(&fragments).map_err(|e| PipelineError::new(Stage::BrandsBuilt, e))?;
        for warning in &source.warnings {
            self.warn(&mut result, warning.clone());
        }

        let plan = create_build_plan(&ctx);
        let build_start = Instant::now();
        self.reporter.report(ProgressEvent::BuildStarted { total_targets: plan.len() });

        let runs = ParallelBuild::new(&engine, &registry, self.reporter.as_ref())
            .with_jobs(ctx.jobs())
            .run(&plan, &source)
            .map_err(|e| PipelineError::new(Stage::BrandsBuilt, e))?;

        let mut first_failure = None;
        for (target, run) in plan.targets().iter().zip(runs) {
            if let Some(error) = run.error {
                if first_failure.is_none() {
                    first_failure = Some(BuildError::PlatformBuildFailed {
                        brand: target.brand.clone(),
                        platform: target.platform.clone(),
                        source: error,
                    });
                }
            }
            result.add_result(run.result);
        }

        self.reporter.report(ProgressEvent::BuildCompleted {
            success: first_failure.is_none(),
            duration_ms: build_start.elapsed().as_millis() as u64,
            succeeded: result.success_count(),
            failed: result.failed_count(),
        });

        if let Some(error) = first_failure {
            return Err(PipelineError::new(Stage::BrandsBuilt, error));
        }
        self.advance(Stage::BrandsBuilt, format!("{} target(s)", result.targets.len()));

        Ok(result)
    }
}
