//! Build pipeline module for tokenpipe
//!
//! Turns the master token file into per-brand, per-platform source files.
//!
//! # Overview
//!
//! The build pipeline consists of:
//! - **Split**: Partition the master file into fragments in the temp directory
//! - **Discovery**: Find the fragments to build from
//! - **Planning**: One target per brand x platform pair
//! - **Execution**: Build every target in parallel through the token engine
//!
//! # Example
//!
//! ```ignore
//! use tokenpipe::build::{ConsoleProgress, Pipeline};
//! use tokenpipe::config::CliOverrides;
//!
//! let mut pipeline = Pipeline::new(std::env::current_dir()?, CliOverrides::default())
//!     .with_reporter(Box::new(ConsoleProgress::new()));
//!
//! let result = pipeline.run()?;
//! println!("{}", result.summary());
//! ```

pub mod context;
pub mod discovery;
pub mod parallel;
pub mod pipeline;
pub mod progress;
pub mod result;
pub mod target;

pub use context::*;
pub use discovery::*;
pub use parallel::*;
pub use pipeline::*;
pub use progress::*;
pub use result::*;
pub use target::*;
