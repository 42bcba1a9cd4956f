//! Tokenpipe - split a master design-token file and build platform outputs per brand

use std::process::ExitCode;

use tokenpipe::cli;

fn main() -> ExitCode {
    cli::run()
}
