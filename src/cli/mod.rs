//! Command-line interface implementation
//!
//! `tokenpipe` with no subcommand runs a full build; `tokenpipe split` stops
//! after writing the fragments.

mod build;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;

/// Tokenpipe - split design tokens and compile them for every platform
#[derive(Parser, Debug)]
#[command(name = "tokenpipe")]
#[command(about = "Tokenpipe - split a master design-token file and build platform outputs per brand")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments for the default `build` command
    #[command(flatten)]
    pub build: BuildArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split the master token file, then build every brand x platform pair (default)
    Build(BuildArgs),

    /// Split the master token file into per-key fragments only
    Split(ConfigArgs),
}

/// Flags shared by every command: where things are and what to build.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Directory holding the master token file (relative to the working directory)
    #[arg(long, value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Config file to use instead of discovering token-config.toml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override output directory (buildPathPrefix)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Override fragment directory (tempDir)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Override master token file name (inputFile)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Brand to build (repeatable; replaces the configured list)
    #[arg(long = "brand", value_name = "BRAND")]
    pub brands: Vec<String>,

    /// Platform to build, or `*` for all (repeatable; replaces the configured list)
    #[arg(long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<String>,

    /// Number of parallel build jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Emit progress as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Flags for the build command.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Dry run (resolve configuration and list targets without writing anything)
    #[arg(long)]
    pub dry_run: bool,

    /// Build only matching targets: `brand`, `brand/platform` or `*/platform` (repeatable)
    #[arg(long = "target", value_name = "PATTERN")]
    pub targets: Vec<String>,
}

/// Initialize logging: `warn` by default, `info` with `-v`; `RUST_LOG` wins.
fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// `--help` and `--version` exit cleanly; any real parse error is a failure.
fn parse_error_exit_code(e: &clap::Error) -> u8 {
    if e.use_stderr() {
        EXIT_ERROR
    } else {
        EXIT_SUCCESS
    }
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_error_exit_code(&e));
        }
    };

    match cli.command {
        Some(Commands::Build(args)) => {
            init_logging(args.config.verbose);
            build::run_build(&args)
        }
        Some(Commands::Split(args)) => {
            init_logging(args.verbose);
            build::run_split(&args)
        }
        None => {
            init_logging(cli.build.config.verbose);
            build::run_build(&cli.build)
        }
    }
}
