//! Token transforms
//!
//! A transform rewrites one aspect of a token for a platform:
//! - **Attribute** transforms fill in [`Attributes`] from the token path
//! - **Name** transforms produce the identifier used in output files
//! - **Value** transforms convert the resolved value (e.g. a gradient object
//!   into a CSS gradient string)
//!
//! Transforms are plain data: a name, a matcher and a function. They are
//! collected in a [`Registry`](crate::registry::Registry) and referenced by
//! name from transform groups and platform tables.

pub mod builtin;
pub mod case;
pub mod gradient;

pub use builtin::*;
pub use gradient::{transform_gradient, GradientError, GradientKind};

use serde_json::Value;
use thiserror::Error;

use crate::color::ColorError;
use crate::tokens::{Attributes, Token};

/// Errors raised by value transforms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Gradient value failed validation
    #[error(transparent)]
    Gradient(#[from] GradientError),
    /// Color value could not be parsed
    #[error("Invalid color '{value}': {source}")]
    Color {
        value: String,
        #[source]
        source: ColorError,
    },
    /// Value has the wrong shape for the transform
    #[error("Unexpected value for {transform}: {message}")]
    UnexpectedValue { transform: &'static str, message: String },
}

/// Options shared by every transform of one platform build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOptions {
    /// Root font size used by px/rem conversions
    pub base_px_font_size: f64,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self { base_px_font_size: 16.0 }
    }
}

/// What a transform produces.
#[derive(Clone, Copy)]
pub enum TransformAction {
    Attribute(fn(&Token) -> Attributes),
    Name(fn(&Token) -> String),
    Value(fn(&Token, &TransformOptions) -> Result<Value, TransformError>),
}

/// A named token transform.
#[derive(Clone, Copy)]
pub struct Transform {
    pub name: &'static str,
    matcher: fn(&Token) -> bool,
    action: TransformAction,
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.action {
            TransformAction::Attribute(_) => "attribute",
            TransformAction::Name(_) => "name",
            TransformAction::Value(_) => "value",
        };
        f.debug_struct("Transform").field("name", &self.name).field("kind", &kind).finish()
    }
}

impl Transform {
    pub const fn new(name: &'static str, matcher: fn(&Token) -> bool, action: TransformAction) -> Self {
        Self { name, matcher, action }
    }

    pub fn matches(&self, token: &Token) -> bool {
        (self.matcher)(token)
    }

    /// Apply to `token` in place; tokens the matcher rejects are untouched.
    pub fn apply(&self, token: &mut Token, options: &TransformOptions) -> Result<(), TransformError> {
        if !self.matches(token) {
            return Ok(());
        }
        match self.action {
            TransformAction::Attribute(f) => token.attributes = f(token),
            TransformAction::Name(f) => token.name = f(token),
            TransformAction::Value(f) => token.value = f(token, options)?,
        }
        Ok(())
    }
}

/// Matcher that accepts every token.
pub fn any_token(_: &Token) -> bool {
    true
}
