//! Build progress reporting.
//!
//! The pipeline reports stage transitions, per-target progress, warnings and
//! a final summary through a [`ProgressReporter`]. Console output is colored
//! when stderr is a terminal; `--json` switches to one JSON object per line.
//!
//! # Example
//!
//! ```ignore
//! use tokenpipe::build::{BuildStatus, ConsoleProgress, ProgressEvent, ProgressReporter};
//!
//! let reporter = ConsoleProgress::new();
//! reporter.report(ProgressEvent::BuildStarted { total_targets: 6 });
//! reporter.report(ProgressEvent::TargetCompleted {
//!     target_id: "dxn-default/css".to_string(),
//!     status: BuildStatus::Success,
//!     duration_ms: 12,
//! });
//! ```

use crate::build::{BuildStatus, Stage};
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Events that can be reported during a run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The pipeline reached a stage
    StageCompleted {
        stage: Stage,
        /// Short human-readable detail ("4 fragments", "config: token-config.toml")
        detail: String,
    },
    /// Brand x platform builds are about to start
    BuildStarted {
        /// Total number of targets to build
        total_targets: usize,
    },
    /// A target build started
    TargetStarted {
        /// Target identifier
        target_id: String,
    },
    /// A target build completed
    TargetCompleted {
        /// Target identifier
        target_id: String,
        /// Build status
        status: BuildStatus,
        /// Duration in milliseconds
        duration_ms: u64,
    },
    /// Build process completed
    BuildCompleted {
        /// Whether the overall build succeeded
        success: bool,
        /// Total duration in milliseconds
        duration_ms: u64,
        /// Number of successful targets
        succeeded: usize,
        /// Number of failed targets
        failed: usize,
    },
    /// A warning was generated
    Warning {
        /// Target that generated the warning (if applicable)
        target_id: Option<String>,
        /// Warning message
        message: String,
    },
    /// An error occurred
    Error {
        /// Target that generated the error (if applicable)
        target_id: Option<String>,
        /// Error message
        message: String,
    },
}

/// Trait for progress reporters.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);

    /// Check if this reporter wants verbose output.
    fn is_verbose(&self) -> bool {
        false
    }
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    /// Create a new null progress reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
    /// Completed target count
    current: AtomicUsize,
    /// Total target count
    total: AtomicUsize,
    /// Output writer (for testing)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .field("current", &self.current)
            .field("total", &self.total)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a console reporter on stderr, colored when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false,
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Set whether to use colors.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn yellow(&self, text: &str) -> String {
        self.color(text, "\x1b[33m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn bold(&self, text: &str) -> String {
        self.color(text, "\x1b[1m")
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::StageCompleted { stage, detail } => {
                if self.verbose || stage == Stage::TokensSplit {
                    let suffix = if detail.is_empty() { String::new() } else { format!(": {}", detail) };
                    self.writeln(&format!("{} {}{}", self.cyan("[stage]"), stage, suffix));
                }
            }
            ProgressEvent::BuildStarted { total_targets } => {
                self.total.store(total_targets, Ordering::SeqCst);
                self.current.store(0, Ordering::SeqCst);
                if total_targets > 0 {
                    self.writeln(&format!(
                        "{} Building {} target{}...",
                        self.cyan("[build]"),
                        total_targets,
                        if total_targets == 1 { "" } else { "s" }
                    ));
                }
            }
            ProgressEvent::TargetStarted { target_id } => {
                if self.verbose {
                    self.writeln(&format!("{} Building {}...", self.cyan("[build]"), target_id));
                }
            }
            ProgressEvent::TargetCompleted { target_id, status, duration_ms } => {
                let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
                let total = self.total.load(Ordering::SeqCst);

                let status_str = match &status {
                    BuildStatus::Success => self.green("ok"),
                    BuildStatus::Planned => self.yellow("planned"),
                    BuildStatus::Failed(_) => self.red("FAILED"),
                };

                self.writeln(&format!(
                    "{} [{}/{}] {} {} ({})",
                    self.cyan("[build]"),
                    current,
                    total,
                    status_str,
                    target_id,
                    format_duration(duration_ms)
                ));

                if let BuildStatus::Failed(err) = status {
                    self.writeln(&format!("        {}", self.red(&err)));
                }
            }
            ProgressEvent::BuildCompleted { success, duration_ms, succeeded, failed } => {
                let duration_str = format_duration(duration_ms);

                if success {
                    self.writeln(&format!(
                        "{} {} {} built in {}",
                        self.green("[done]"),
                        self.bold(&succeeded.to_string()),
                        if succeeded == 1 { "target" } else { "targets" },
                        duration_str
                    ));
                } else {
                    self.writeln(&format!(
                        "{} Build failed: {} succeeded, {} {} in {}",
                        self.red("[error]"),
                        succeeded,
                        failed,
                        if failed == 1 { "failure" } else { "failures" },
                        duration_str
                    ));
                }
            }
            ProgressEvent::Warning { target_id, message } => {
                let prefix = target_id.map(|id| format!("{}: ", id)).unwrap_or_default();
                self.writeln(&format!("{} {}{}", self.yellow("[warn]"), prefix, message));
            }
            ProgressEvent::Error { target_id, message } => {
                let prefix = target_id.map(|id| format!("{}: ", id)).unwrap_or_default();
                self.writeln(&format!("{} {}{}", self.red("[error]"), prefix, message));
            }
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// JSON-lines progress reporter for machine-readable output.
pub struct JsonProgress {
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for JsonProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonProgress").finish()
    }
}

impl JsonProgress {
    /// Create a new JSON progress reporter writing to stderr.
    pub fn new() -> Self {
        Self { output: Mutex::new(Box::new(std::io::stderr())) }
    }

    /// Create a JSON progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { output: Mutex::new(Box::new(output)) }
    }

    fn write_json(&self, value: &serde_json::Value) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", value);
        }
    }
}

impl Default for JsonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ProgressEvent) {
        let value = match event {
            ProgressEvent::StageCompleted { stage, detail } => {
                json!({ "event": "stage_completed", "stage": stage.as_str(), "detail": detail })
            }
            ProgressEvent::BuildStarted { total_targets } => {
                json!({ "event": "build_started", "total_targets": total_targets })
            }
            ProgressEvent::TargetStarted { target_id } => {
                json!({ "event": "target_started", "target_id": target_id })
            }
            ProgressEvent::TargetCompleted { target_id, status, duration_ms } => {
                let mut value = json!({
                    "event": "target_completed",
                    "target_id": target_id,
                    "status": match &status {
                        BuildStatus::Success => "success",
                        BuildStatus::Planned => "planned",
                        BuildStatus::Failed(_) => "failed",
                    },
                    "duration_ms": duration_ms,
                });
                if let BuildStatus::Failed(error) = status {
                    value["error"] = json!(error);
                }
                value
            }
            ProgressEvent::BuildCompleted { success, duration_ms, succeeded, failed } => json!({
                "event": "build_completed",
                "success": success,
                "duration_ms": duration_ms,
                "succeeded": succeeded,
                "failed": failed,
            }),
            ProgressEvent::Warning { target_id, message } => {
                let mut value = json!({ "event": "warning", "message": message });
                if let Some(id) = target_id {
                    value["target_id"] = json!(id);
                }
                value
            }
            ProgressEvent::Error { target_id, message } => {
                let mut value = json!({ "event": "error", "message": message });
                if let Some(id) = target_id {
                    value["target_id"] = json!(id);
                }
                value
            }
        };
        self.write_json(&value);
    }
}

/// Format a duration in milliseconds to a human-readable string.
fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}
