//! Output formats for transformed tokens.
//!
//! A format renders the tokens selected for one output file into the text of
//! that file. Formats are looked up by name through the
//! [`Registry`](crate::registry::Registry).
//!
//! # Supported Formats
//!
//! - **Web**: `css/variables`, `scss/variables`, `javascript/es6`, `typescript/es6`
//! - **JSON**: `json`, `json/nested`
//! - **Android**: `android/colors`, `android/resources`, `compose/object`
//! - **iOS**: `ios/macros`, `ios/colors.h`, `ios/colors.m`, `ios/static.h`,
//!   `ios/static.m`, `ios-swift/class.swift`, `ios-swift/enum.swift`,
//!   `ios-swift/any.swift`

pub mod android;
pub mod ios;
pub mod json;
pub mod web;

pub use android::*;
pub use ios::*;
pub use json::*;
pub use web::*;

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::color::format_number;
use crate::tokens::Token;

/// Header line carried by every generated file that has comment syntax.
pub const GENERATED_NOTICE: &str = "Do not edit directly, this file was auto-generated.";

/// Common error type for format rendering.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The file spec lacks an option this format needs
    #[error("format '{format}' requires the '{option}' option")]
    MissingOption { format: &'static str, option: &'static str },
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Per-file options a format may read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatOptions {
    /// Emit references to other tokens instead of resolved values
    pub output_references: bool,
    /// Class or object name; defaults to the destination file stem
    pub class_name: Option<String>,
    /// Kotlin package
    pub package_name: Option<String>,
    /// Objective-C value or enum type name
    pub type_name: Option<String>,
    /// Swift access level (`public`, `internal`, ...)
    pub access_control: Option<String>,
    /// Swift modules to import
    pub imports: Vec<String>,
    /// Swift declaration kind for `ios-swift/any.swift` (`class`, `struct`, `enum`)
    pub object_type: Option<String>,
}

/// Everything a format needs to render one file.
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'a> {
    /// Tokens selected for this file, in dictionary order
    pub tokens: &'a [&'a Token],
    /// Every token of the build, used to resolve output references
    pub dictionary: &'a [Token],
    pub options: &'a FormatOptions,
    /// Destination path relative to the platform build directory
    pub destination: &'a str,
}

impl<'a> FormatContext<'a> {
    /// Configured class name, else the destination file stem.
    pub fn class_name(&self) -> String {
        if let Some(name) = &self.options.class_name {
            return name.clone();
        }
        Path::new(self.destination)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(self.destination)
            .to_string()
    }

    /// Output name of the token `token` refers to, when output references
    /// are enabled and its source value is a single reference.
    pub fn referenced_name(&self, token: &Token) -> Option<&'a str> {
        if !self.options.output_references {
            return None;
        }
        let target = token.reference_target()?;
        self.dictionary.iter().find(|t| t.dotted_path() == target).map(|t| t.name.as_str())
    }
}

/// Trait for output format implementations.
pub trait Format: Send + Sync {
    /// Name used in platform file specs.
    fn format_name(&self) -> &'static str;

    /// Render the complete file contents.
    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError>;
}

/// Every built-in format.
pub fn builtin_formats() -> Vec<Box<dyn Format>> {
    vec![
        Box::new(CssVariables),
        Box::new(ScssVariables),
        Box::new(JavascriptEs6),
        Box::new(TypescriptEs6),
        Box::new(JsonFormat),
        Box::new(JsonNested),
        Box::new(AndroidColors),
        Box::new(AndroidResources),
        Box::new(ComposeObject),
        Box::new(IosMacros),
        Box::new(IosColorsH),
        Box::new(IosColorsM),
        Box::new(IosStaticH),
        Box::new(IosStaticM),
        Box::new(SwiftObject::class()),
        Box::new(SwiftObject::enumeration()),
        Box::new(SwiftObject::any()),
    ]
}

/// `/** ... */` block header used by C-family outputs.
pub(crate) fn block_header() -> String {
    format!("/**\n * {}\n */\n\n", GENERATED_NOTICE)
}

/// Token value as text: strings verbatim, numbers without a trailing `.0`,
/// anything else as compact JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

/// Whether the value is already target-language code and must not be quoted.
///
/// Color and dimension transforms for native platforms produce literals such
/// as `Color(0xff000000)` or `CGFloat(4.00)`; numbers are always raw.
pub(crate) fn is_code_literal(token: &Token) -> bool {
    match &token.value {
        Value::Number(_) | Value::Bool(_) => true,
        Value::String(_) => token.is_type("color") || token.is_type("dimension"),
        _ => false,
    }
}

/// Double-quoted string literal with JSON escaping, valid in JS, Kotlin and Swift.
pub(crate) fn quoted(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Value rendered as a literal for JS, Kotlin or Swift.
pub(crate) fn literal(token: &Token) -> String {
    let text = value_text(&token.value);
    if is_code_literal(token) {
        text
    } else {
        quoted(&text)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_format_names_are_unique() {
        let formats = builtin_formats();
        let mut names: Vec<_> = formats.iter().map(|f| f.format_name()).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
        assert_eq!(before, 17);
    }

    #[test]
    fn test_class_name_defaults_to_stem() {
        let options = FormatOptions::default();
        let ctx = FormatContext {
            tokens: &[],
            dictionary: &[],
            options: &options,
            destination: "StyleDictionaryColor.kt",
        };
        assert_eq!(ctx.class_name(), "StyleDictionaryColor");
    }

    #[test]
    fn test_literal_quoting() {
        assert_eq!(literal(&token(&["c"], "color", json!("Color(0xff000000)"))), "Color(0xff000000)");
        assert_eq!(literal(&token(&["d"], "duration", json!("0.20s"))), "\"0.20s\"");
        assert_eq!(literal(&token(&["n"], "number", json!(1.5))), "1.5");
    }

    #[test]
    fn test_referenced_name_requires_option() {
        let base = named(token(&["base", "red"], "color", json!("#ff0000")), "base-red");
        let mut alias = named(token(&["brand"], "color", json!("#ff0000")), "brand");
        alias.original = json!("{base.red}");
        let dictionary = vec![base, alias.clone()];

        let off = FormatOptions::default();
        let ctx = FormatContext { tokens: &[], dictionary: &dictionary, options: &off, destination: "x" };
        assert_eq!(ctx.referenced_name(&alias), None);

        let on = FormatOptions { output_references: true, ..Default::default() };
        let ctx = FormatContext { tokens: &[], dictionary: &dictionary, options: &on, destination: "x" };
        assert_eq!(ctx.referenced_name(&alias), Some("base-red"));
    }
}
