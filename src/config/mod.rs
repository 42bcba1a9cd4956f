//! Configuration module for the token build pipeline
//!
//! Provides types and parsing for `token-config.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
