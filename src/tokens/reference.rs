//! Token reference resolution
//!
//! Token values may point at other tokens with `{path.to.token}`:
//! - A value that is exactly one reference takes the referenced value as-is,
//!   whatever its JSON type
//! - References embedded in a longer string are substituted textually
//! - Objects and arrays are resolved element by element
//!
//! Chains are followed to the end; cycles and unknown paths are errors.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tokenpipe::tokens::ReferenceResolver;
//!
//! let mut resolver = ReferenceResolver::new();
//! resolver.define("color.base.red", json!("#ff0000"));
//! resolver.define("color.brand", json!("{color.base.red}"));
//!
//! assert_eq!(resolver.resolve(&json!("{color.brand}")).unwrap(), json!("#ff0000"));
//! assert_eq!(
//!     resolver.resolve(&json!("1px solid {color.brand}")).unwrap(),
//!     json!("1px solid #ff0000")
//! );
//! ```

use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Error type for reference resolution failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// Reference to a path that is not a token
    #[error("Reference not found: {{{0}}}")]
    Undefined(String),
    /// Circular dependency detected
    #[error("Circular definition: {}", .0.join(" -> "))]
    Circular(Vec<String>),
    /// Maximum recursion depth exceeded
    #[error("maximum reference resolution depth exceeded")]
    MaxDepthExceeded,
}

/// Maximum reference chain length
const MAX_RESOLUTION_DEPTH: usize = 100;

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([^{}\s]+)\}").expect("reference pattern is valid"))
}

/// If `s` is exactly one `{path}` reference, return the path.
pub fn as_reference(s: &str) -> Option<&str> {
    let captures = reference_pattern().captures(s)?;
    let whole = captures.get(0)?;
    if whole.start() == 0 && whole.end() == s.len() {
        captures.get(1).map(|m| m.as_str())
    } else {
        None
    }
}

/// Whether a value contains a reference anywhere.
pub fn contains_reference(value: &Value) -> bool {
    match value {
        Value::String(s) => reference_pattern().is_match(s),
        Value::Array(items) => items.iter().any(contains_reference),
        Value::Object(map) => map.values().any(contains_reference),
        _ => false,
    }
}

/// Registry of raw token values keyed by dotted path.
#[derive(Debug, Clone, Default)]
pub struct ReferenceResolver {
    values: HashMap<String, Value>,
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self { values: HashMap::new() }
    }

    /// Register the raw value of the token at `path` (dotted form).
    pub fn define(&mut self, path: &str, value: Value) {
        self.values.insert(path.to_string(), value);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.values.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolve every reference inside `value`.
    pub fn resolve(&self, value: &Value) -> Result<Value, ReferenceError> {
        let mut chain = Vec::new();
        self.resolve_internal(value, &mut chain)
    }

    fn resolve_internal(
        &self,
        value: &Value,
        chain: &mut Vec<String>,
    ) -> Result<Value, ReferenceError> {
        if chain.len() > MAX_RESOLUTION_DEPTH {
            return Err(ReferenceError::MaxDepthExceeded);
        }

        match value {
            Value::String(s) => self.resolve_string(s, chain),
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_internal(item, chain))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut resolved = serde_json::Map::with_capacity(map.len());
                for (key, item) in map {
                    resolved.insert(key.clone(), self.resolve_internal(item, chain)?);
                }
                Ok(Value::Object(resolved))
            }
            other => Ok(other.clone()),
        }
    }

    fn resolve_string(&self, s: &str, chain: &mut Vec<String>) -> Result<Value, ReferenceError> {
        if let Some(path) = as_reference(s) {
            return self.resolve_path(path, chain);
        }

        if !reference_pattern().is_match(s) {
            return Ok(Value::String(s.to_string()));
        }

        let mut result = String::with_capacity(s.len());
        let mut last = 0;
        for captures in reference_pattern().captures_iter(s) {
            let (Some(whole), Some(path)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            result.push_str(&s[last..whole.start()]);
            match self.resolve_path(path.as_str(), chain)? {
                Value::String(text) => result.push_str(&text),
                other => result.push_str(&other.to_string()),
            }
            last = whole.end();
        }
        result.push_str(&s[last..]);

        Ok(Value::String(result))
    }

    fn resolve_path(&self, path: &str, chain: &mut Vec<String>) -> Result<Value, ReferenceError> {
        if chain.iter().any(|p| p == path) {
            let mut cycle = chain.clone();
            cycle.push(path.to_string());
            return Err(ReferenceError::Circular(cycle));
        }

        let raw = self.values.get(path).ok_or_else(|| ReferenceError::Undefined(path.to_string()))?;

        chain.push(path.to_string());
        let resolved = self.resolve_internal(raw, chain);
        chain.pop();
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_reference() {
        assert_eq!(as_reference("{a.b}"), Some("a.b"));
        assert_eq!(as_reference("x {a.b}"), None);
        assert_eq!(as_reference("#fff"), None);
    }

    #[test]
    fn test_plain_values_pass_through() {
        let resolver = ReferenceResolver::new();
        assert_eq!(resolver.resolve(&json!("#fff")).unwrap(), json!("#fff"));
        assert_eq!(resolver.resolve(&json!(12)).unwrap(), json!(12));
    }

    #[test]
    fn test_whole_reference_keeps_type() {
        let mut resolver = ReferenceResolver::new();
        resolver.define("size.base", json!(16));
        resolver.define("shadow.card", json!({ "blur": "{size.base}" }));

        assert_eq!(resolver.resolve(&json!("{size.base}")).unwrap(), json!(16));
        assert_eq!(resolver.resolve(&json!("{shadow.card}")).unwrap(), json!({ "blur": 16 }));
    }

    #[test]
    fn test_nested_object_references() {
        let mut resolver = ReferenceResolver::new();
        resolver.define("color.black", json!("#000000"));

        let gradient = json!({
            "angle": 90,
            "stops": [{ "color": "{color.black}", "position": "0%" }]
        });
        let resolved = resolver.resolve(&gradient).unwrap();
        assert_eq!(resolved["stops"][0]["color"], json!("#000000"));
    }

    #[test]
    fn test_embedded_references() {
        let mut resolver = ReferenceResolver::new();
        resolver.define("a", json!("1px"));
        resolver.define("b", json!(2));
        assert_eq!(resolver.resolve(&json!("{a} {b}px")).unwrap(), json!("1px 2px"));
    }

    #[test]
    fn test_undefined_reference() {
        let resolver = ReferenceResolver::new();
        assert_eq!(
            resolver.resolve(&json!("{missing.token}")),
            Err(ReferenceError::Undefined("missing.token".to_string()))
        );
    }

    #[test]
    fn test_circular_reference() {
        let mut resolver = ReferenceResolver::new();
        resolver.define("a", json!("{b}"));
        resolver.define("b", json!("{a}"));

        match resolver.resolve(&json!("{a}")) {
            Err(ReferenceError::Circular(chain)) => {
                assert_eq!(chain, vec!["a".to_string(), "b".to_string(), "a".to_string()]);
            }
            other => panic!("expected circular error, got {:?}", other),
        }
    }

    #[test]
    fn test_same_reference_twice_is_not_a_cycle() {
        let mut resolver = ReferenceResolver::new();
        resolver.define("a", json!("x"));
        assert_eq!(resolver.resolve(&json!(["{a}", "{a}"])).unwrap(), json!(["x", "x"]));
    }
}
