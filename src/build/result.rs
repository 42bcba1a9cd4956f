//! Outcome of a pipeline run: one entry per brand x platform target plus the
//! fragments and warnings of the split and merge stages.

use std::path::PathBuf;
use std::time::Duration;

/// Warnings listed in the summary before the rest are folded into a count.
const SUMMARY_WARNING_LIMIT: usize = 5;

/// Status of a single brand x platform target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// Platform files written
    Success,
    /// Dry run, nothing written
    Planned,
    /// Compilation failed with the given message
    Failed(String),
}

impl BuildStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, BuildStatus::Failed(_))
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Success => write!(f, "success"),
            BuildStatus::Planned => write!(f, "planned"),
            BuildStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of compiling one brand for one platform.
#[derive(Debug, Clone)]
pub struct TargetResult {
    /// `brand/platform`
    pub target_id: String,
    pub status: BuildStatus,
    /// Platform files written under `build/<brand>/<platform>/`
    pub outputs: Vec<PathBuf>,
    pub duration: Duration,
    /// Skipped-file notices from the platform formatters
    pub warnings: Vec<String>,
}

impl TargetResult {
    pub fn success(target_id: String, outputs: Vec<PathBuf>, duration: Duration) -> Self {
        Self { target_id, status: BuildStatus::Success, outputs, duration, warnings: Vec::new() }
    }

    pub fn planned(target_id: String) -> Self {
        Self::with_status(target_id, BuildStatus::Planned, Duration::ZERO)
    }

    pub fn failed(target_id: String, error: String, duration: Duration) -> Self {
        Self::with_status(target_id, BuildStatus::Failed(error), duration)
    }

    fn with_status(target_id: String, status: BuildStatus, duration: Duration) -> Self {
        Self { target_id, status, outputs: Vec::new(), duration, warnings: Vec::new() }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Result of a complete pipeline run.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Fragments written by the split stage
    pub fragments: Vec<PathBuf>,
    /// Results for each brand x platform target, in plan order
    pub targets: Vec<TargetResult>,
    /// Warnings not tied to a target (split, merge)
    pub warnings: Vec<String>,
    pub total_duration: Duration,
}

impl BuildResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: TargetResult) {
        self.targets.push(result);
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    fn count(&self, pred: impl Fn(&BuildStatus) -> bool) -> usize {
        self.targets.iter().filter(|t| pred(&t.status)).count()
    }

    pub fn success_count(&self) -> usize {
        self.count(|s| *s == BuildStatus::Success)
    }

    pub fn failed_count(&self) -> usize {
        self.count(BuildStatus::is_failure)
    }

    /// A run succeeds when no target failed; planned targets count as fine.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Split and merge warnings first, then per-target warnings in plan order.
    pub fn all_warnings(&self) -> Vec<&String> {
        self.warnings.iter().chain(self.targets.iter().flat_map(|t| t.warnings.iter())).collect()
    }

    /// Human-readable report printed by the CLI.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        let failed = self.failed_count();
        let planned = self.count(|s| *s == BuildStatus::Planned);

        if failed > 0 {
            lines.push(format!(
                "Build failed: {} succeeded, {} failed ({} total)",
                self.success_count(),
                failed,
                self.targets.len()
            ));
            for target in self.targets.iter().filter(|t| t.status.is_failure()) {
                lines.push(format!("  - {}: {}", target.target_id, target.status));
            }
        } else if planned > 0 {
            lines.push(format!("Dry run: {} target(s) planned", planned));
            lines.extend(self.targets.iter().map(|t| format!("  - {}", t.target_id)));
        } else {
            let files: usize = self.targets.iter().map(|t| t.outputs.len()).sum();
            lines.push(format!(
                "Build succeeded: {} target(s), {} file(s) from {} fragment(s) in {:?}",
                self.success_count(),
                files,
                self.fragments.len(),
                self.total_duration
            ));
        }

        let warnings = self.all_warnings();
        if !warnings.is_empty() {
            lines.push(format!("Warnings ({}):", warnings.len()));
            for warning in warnings.iter().take(SUMMARY_WARNING_LIMIT) {
                lines.push(format!("  - {}", warning));
            }
            if warnings.len() > SUMMARY_WARNING_LIMIT {
                lines.push(format!("  ... and {} more", warnings.len() - SUMMARY_WARNING_LIMIT));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn css_target(brand: &str, files: &[&str]) -> TargetResult {
        TargetResult::success(
            format!("{}/css", brand),
            files.iter().copied().map(PathBuf::from).collect(),
            Duration::from_millis(10),
        )
    }

    #[test]
    fn test_failed_brand_fails_the_run() {
        let mut result = BuildResult::new();
        result.add_result(css_target("dxn-default", &["build/dxn-default/css/tokens.css"]));
        result.add_result(TargetResult::failed(
            "zrh-default/css".to_string(),
            "Reference {color.missing} not found".to_string(),
            Duration::ZERO,
        ));

        assert!(!result.is_success());
        assert_eq!(result.success_count(), 1);
        let summary = result.summary();
        assert!(summary.starts_with("Build failed: 1 succeeded, 1 failed (2 total)"));
        assert!(summary.contains("  - zrh-default/css: failed: Reference {color.missing} not found"));
        assert!(!summary.contains("dxn-default"));
    }

    #[test]
    fn test_summary_counts_platform_files_and_fragments() {
        let mut result = BuildResult::new();
        result.fragments = vec![PathBuf::from("temp/global.json"), PathBuf::from("temp/Themes_ZRH.json")];
        result.warnings.push("Key \"X\" not found in the tokens file.".to_string());
        result.add_result(
            css_target("acme", &["build/acme/css/tokens.css", "build/acme/css/typography.css"])
                .with_warnings(vec!["No tokens for css/shadows.css. File not created.".to_string()]),
        );

        let summary = result.summary();
        assert!(summary.starts_with("Build succeeded: 1 target(s), 2 file(s) from 2 fragment(s)"));
        assert!(summary.contains("Warnings (2):"));
        assert_eq!(
            result.all_warnings(),
            vec!["Key \"X\" not found in the tokens file.", "No tokens for css/shadows.css. File not created."]
        );
    }

    #[test]
    fn test_summary_folds_extra_warnings() {
        let mut result = BuildResult::new();
        result.warnings = (0..7).map(|i| format!("warning {}", i)).collect();

        let summary = result.summary();
        assert!(summary.contains("warning 4"));
        assert!(!summary.contains("warning 5"));
        assert!(summary.contains("... and 2 more"));
    }

    #[test]
    fn test_dry_run_lists_every_target() {
        let mut result = BuildResult::new();
        result.add_result(TargetResult::planned("acme/css".to_string()));
        result.add_result(TargetResult::planned("acme/js".to_string()));

        assert!(result.is_success());
        let summary = result.summary();
        assert!(summary.starts_with("Dry run: 2 target(s) planned"));
        assert!(summary.contains("  - acme/css\n  - acme/js"));
    }
}
