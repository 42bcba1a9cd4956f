//! Parallel build execution.
//!
//! Brand x platform targets share nothing mutable: the merged token source and
//! the registry are read-only and every target writes its own directory. All
//! targets of a plan therefore run at once on a dedicated rayon pool sized by
//! `jobs`. Results come back in plan order regardless of completion order.
//!
//! # Example
//!
//! ```ignore
//! use tokenpipe::build::{NullProgress, ParallelBuild};
//!
//! let runs = ParallelBuild::new(&engine, &registry, &NullProgress)
//!     .with_jobs(4)
//!     .run(&plan, &source)?;
//! ```

use crate::build::{BuildError, BuildPlan, BuildTarget, ProgressEvent, ProgressReporter, TargetResult};
use crate::engine::{EngineError, TokenEngine, TokenSource};
use crate::registry::Registry;
use rayon::prelude::*;
use std::time::Instant;

/// Default number of parallel jobs (uses available parallelism).
fn default_jobs() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Outcome of one target: the reportable result plus the engine error that
/// caused a failure.
#[derive(Debug)]
pub struct TargetRun {
    pub result: TargetResult,
    pub error: Option<EngineError>,
}

/// Parallel build executor.
pub struct ParallelBuild<'a> {
    engine: &'a dyn TokenEngine,
    registry: &'a Registry,
    reporter: &'a dyn ProgressReporter,
    /// Number of parallel jobs
    jobs: usize,
}

impl<'a> ParallelBuild<'a> {
    /// Create a new parallel build.
    pub fn new(
        engine: &'a dyn TokenEngine,
        registry: &'a Registry,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self { engine, registry, reporter, jobs: default_jobs() }
    }

    /// Set the number of parallel jobs.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Get the number of parallel jobs.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Build every target of `plan` from `source`.
    ///
    /// Every target runs to completion even when another fails; the caller
    /// decides what a failure means for the run.
    pub fn run(&self, plan: &BuildPlan, source: &TokenSource) -> Result<Vec<TargetRun>, BuildError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build()?;
        log::debug!("Building {} target(s) with {} worker(s)", plan.len(), self.jobs);

        Ok(pool.install(|| {
            plan.targets().par_iter().map(|target| self.build_target(target, source)).collect()
        }))
    }

    fn build_target(&self, target: &BuildTarget, source: &TokenSource) -> TargetRun {
        let start = Instant::now();
        self.reporter.report(ProgressEvent::TargetStarted { target_id: target.id.clone() });

        let outcome = self.engine.build_platform(source, &target.config, self.registry);
        let duration = start.elapsed();

        let run = match outcome {
            Ok(output) => {
                for warning in &output.warnings {
                    self.reporter.report(ProgressEvent::Warning {
                        target_id: Some(target.id.clone()),
                        message: warning.clone(),
                    });
                }
                TargetRun {
                    result: TargetResult::success(target.id.clone(), output.files, duration)
                        .with_warnings(output.warnings),
                    error: None,
                }
            }
            Err(e) => {
                log::debug!("{} failed: {}", target.id, e);
                TargetRun {
                    result: TargetResult::failed(target.id.clone(), e.to_string(), duration),
                    error: Some(e),
                }
            }
        };

        self.reporter.report(ProgressEvent::TargetCompleted {
            target_id: target.id.clone(),
            status: run.result.status.clone(),
            duration_ms: duration.as_millis() as u64,
        });
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BuildStatus, NullProgress};
    use crate::engine::{EngineError, PlatformOutput};
    use crate::platforms::PlatformConfig;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Engine that fails the `js` platform and counts calls.
    #[derive(Default)]
    struct StubEngine {
        calls: AtomicUsize,
    }

    impl TokenEngine for StubEngine {
        fn load(&self, fragments: &[PathBuf]) -> Result<TokenSource, EngineError> {
            Ok(TokenSource {
                tree: serde_json::json!({}),
                fragments: fragments.to_vec(),
                warnings: vec![],
            })
        }

        fn build_platform(
            &self,
            _source: &TokenSource,
            platform: &PlatformConfig,
            _registry: &Registry,
        ) -> Result<PlatformOutput, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if platform.name == "js" {
                return Err(EngineError::SourceNotObject(PathBuf::from("stub.json")));
            }
            Ok(PlatformOutput {
                files: vec![platform.build_path.join("tokens.css")],
                warnings: vec!["stub warning".to_string()],
            })
        }
    }

    fn plan(brands: &[&str], platforms: &[&str]) -> BuildPlan {
        let mut plan = BuildPlan::new();
        for brand in brands {
            for platform in platforms {
                plan.add_target(BuildTarget::new(brand, platform, Path::new("/out")).unwrap());
            }
        }
        plan
    }

    #[test]
    fn test_runs_every_target_in_plan_order() {
        let engine = StubEngine::default();
        let registry = Registry::builtin();
        let source = engine.load(&[]).unwrap();
        let plan = plan(&["a", "b"], &["css", "js", "json"]);

        let runs = ParallelBuild::new(&engine, &registry, &NullProgress)
            .with_jobs(4)
            .run(&plan, &source)
            .expect("should run");

        assert_eq!(engine.calls.load(Ordering::SeqCst), 6);
        let ids: Vec<_> = runs.iter().map(|r| r.result.target_id.as_str()).collect();
        assert_eq!(ids, vec!["a/css", "a/js", "a/json", "b/css", "b/js", "b/json"]);
    }

    #[test]
    fn test_failures_keep_their_error() {
        let engine = StubEngine::default();
        let registry = Registry::builtin();
        let source = engine.load(&[]).unwrap();

        let runs = ParallelBuild::new(&engine, &registry, &NullProgress)
            .run(&plan(&["a"], &["css", "js"]), &source)
            .expect("should run");

        assert_eq!(runs[0].result.status, BuildStatus::Success);
        assert_eq!(runs[0].result.warnings, vec!["stub warning"]);
        assert!(runs[1].result.status.is_failure());
        assert!(matches!(runs[1].error, Some(EngineError::SourceNotObject(_))));
    }

    #[test]
    fn test_jobs_at_least_one() {
        let engine = StubEngine::default();
        let registry = Registry::builtin();
        let build = ParallelBuild::new(&engine, &registry, &NullProgress).with_jobs(0);
        assert_eq!(build.jobs(), 1);
    }
}
