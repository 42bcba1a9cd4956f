//! Tokenpipe - Library for splitting and compiling design tokens
//!
//! This library provides functionality to:
//! - Split a master design-token JSON file into per-theme fragments
//! - Resolve token references and render gradient values to CSS
//! - Build CSS/SCSS, JS/TS, JSON, Android, Compose and iOS sources per brand

pub mod build;
pub mod cli;
pub mod color;
pub mod config;
pub mod engine;
pub mod formats;
pub mod platforms;
pub mod registry;
pub mod split;
pub mod tokens;
pub mod transforms;
