//! Token transformation engine
//!
//! The orchestrator talks to the engine through [`TokenEngine`]: load the
//! split fragments once, then build each brand x platform pair from the
//! loaded source. [`DictionaryEngine`] is the built-in implementation.

mod dictionary;

pub use dictionary::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::formats::FormatError;
use crate::platforms::PlatformConfig;
use crate::registry::{Registry, RegistryError};
use crate::tokens::TokenError;
use crate::transforms::TransformError;

/// Errors raised while loading fragments or building a platform.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Fragment could not be read or an output could not be written
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Fragment is not valid JSON/JSON5
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    /// Fragment root is not an object
    #[error("Token source {0} must contain a JSON object")]
    SourceNotObject(PathBuf),
    /// Flattening or reference resolution failed
    #[error(transparent)]
    Token(#[from] TokenError),
    /// A transform, group or format name is not registered
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A transform rejected a token value
    #[error("Transform failed for token '{token}': {source}")]
    Transform {
        token: String,
        #[source]
        source: TransformError,
    },
    /// A format failed to render a file
    #[error("Failed to render {destination}: {source}")]
    Format {
        destination: String,
        #[source]
        source: FormatError,
    },
}

/// Engine-wide settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Root font size for px/rem conversions
    pub base_px_font_size: f64,
    /// Read `$value`/`$type` (DTCG) rather than `value`/`type`
    pub uses_dtcg: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { base_px_font_size: 16.0, uses_dtcg: true }
    }
}

/// Merged token tree loaded from the fragments.
#[derive(Debug, Clone)]
pub struct TokenSource {
    pub tree: serde_json::Value,
    /// Fragments that were merged, in merge order
    pub fragments: Vec<PathBuf>,
    /// Non-fatal problems found while merging
    pub warnings: Vec<String>,
}

/// What one platform build produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformOutput {
    pub files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

/// Seam between the orchestrator and the transformation engine.
pub trait TokenEngine: Send + Sync {
    /// Load and merge token fragments.
    fn load(&self, fragments: &[PathBuf]) -> Result<TokenSource, EngineError>;

    /// Build one platform of one brand from a loaded source.
    fn build_platform(
        &self,
        source: &TokenSource,
        platform: &PlatformConfig,
        registry: &Registry,
    ) -> Result<PlatformOutput, EngineError>;
}
