//! Build and split command implementations

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{BuildArgs, ConfigArgs, EXIT_ERROR, EXIT_SUCCESS};
use crate::build::{BuildResult, ConsoleProgress, JsonProgress, Pipeline, ProgressReporter};
use crate::config::CliOverrides;

/// Translate CLI flags into config overrides.
///
/// Directory flags are relative to the working directory, not the project
/// root, so they are made absolute here.
fn overrides_from_args(args: &ConfigArgs, cwd: &Path) -> CliOverrides {
    let absolute = |p: &PathBuf| cwd.join(p);
    CliOverrides {
        source: args.source.as_ref().map(absolute),
        out: args.out.as_ref().map(absolute),
        temp_dir: args.temp_dir.as_ref().map(absolute),
        input_file: args.input.clone(),
        brands: (!args.brands.is_empty()).then(|| args.brands.clone()),
        platforms: (!args.platforms.is_empty()).then(|| args.platforms.clone()),
        jobs: args.jobs,
    }
}

fn reporter(args: &ConfigArgs) -> Box<dyn ProgressReporter> {
    if args.json {
        Box::new(JsonProgress::new())
    } else {
        Box::new(ConsoleProgress::new().with_verbose(args.verbose))
    }
}

/// Print the final result: a summary on stdout, or one JSON object with `--json`.
fn print_result(result: &BuildResult, json: bool) {
    if json {
        let value = serde_json::json!({
            "success": result.is_success(),
            "fragments": result.fragments,
            "targets": result.targets.iter().map(|t| serde_json::json!({
                "id": t.target_id,
                "status": t.status.to_string(),
                "outputs": t.outputs,
            })).collect::<Vec<_>>(),
            "warnings": result.all_warnings(),
            "duration_ms": result.total_duration.as_millis() as u64,
        });
        println!("{}", value);
    } else {
        println!("{}", result.summary());
    }
}

fn run_pipeline(args: &ConfigArgs, configure: impl FnOnce(Pipeline) -> Pipeline) -> ExitCode {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("Error: cannot determine working directory: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let pipeline = Pipeline::new(cwd.clone(), overrides_from_args(args, &cwd))
        .with_config_path(args.config.clone())
        .with_reporter(reporter(args))
        .with_verbose(args.verbose);
    let mut pipeline = configure(pipeline);

    // Failures were already reported, with their stage, by the progress reporter.
    match pipeline.run() {
        Ok(result) => {
            print_result(&result, args.json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(_) => ExitCode::from(EXIT_ERROR),
    }
}

/// Run the build command
pub fn run_build(args: &BuildArgs) -> ExitCode {
    run_pipeline(&args.config, |pipeline| {
        pipeline.with_dry_run(args.dry_run).with_filter(args.targets.clone())
    })
}

/// Run the split command
pub fn run_split(args: &ConfigArgs) -> ExitCode {
    run_pipeline(args, |pipeline| pipeline.with_split_only(true))
}
