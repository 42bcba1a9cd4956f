//! Design token model
//!
//! Fragments are trees of groups and tokens. Any object that carries a value
//! key (`$value` in DTCG mode, `value` otherwise) is a token; every other
//! object is a group. A group's `$type` is inherited by the tokens under it
//! unless they declare their own.

pub mod reference;

pub use reference::*;

use serde_json::{Map, Value};
use thiserror::Error;

/// Key names used to read tokens, which differ between DTCG and legacy files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenKeys {
    pub value: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
}

impl TokenKeys {
    pub const DTCG: TokenKeys =
        TokenKeys { value: "$value", kind: "$type", description: "$description" };
    pub const LEGACY: TokenKeys = TokenKeys { value: "value", kind: "type", description: "comment" };

    pub fn for_format(uses_dtcg: bool) -> Self {
        if uses_dtcg {
            Self::DTCG
        } else {
            Self::LEGACY
        }
    }

    /// Whether `value` is a token object under these keys.
    pub fn is_token(&self, value: &Value) -> bool {
        value.as_object().is_some_and(|map| map.contains_key(self.value))
    }
}

/// Category/type/item attributes derived from a token's path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub category: Option<String>,
    pub kind: Option<String>,
    pub item: Option<String>,
    pub subitem: Option<String>,
    pub state: Option<String>,
}

/// One design token, flattened out of its fragment tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Path segments from the fragment root
    pub path: Vec<String>,
    /// Output name; starts as the dash-joined path until a name transform runs
    pub name: String,
    /// `$type`, declared or inherited
    pub token_type: Option<String>,
    /// Current value, resolved and then transformed
    pub value: Value,
    /// Value as written in the source, references intact
    pub original: Value,
    /// `$description`
    pub comment: Option<String>,
    pub attributes: Attributes,
}

impl Token {
    /// Dotted path, the form used in `{...}` references.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    pub fn is_type(&self, kind: &str) -> bool {
        self.token_type.as_deref() == Some(kind)
    }

    /// If the source value is exactly one reference, the referenced path.
    pub fn reference_target(&self) -> Option<&str> {
        self.original.as_str().and_then(as_reference)
    }
}

/// Errors raised while building a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The merged source tree is not an object
    #[error("token source root must be an object")]
    RootNotObject,
    /// A token's value could not be resolved
    #[error("Failed to resolve '{path}': {source}")]
    Reference {
        path: String,
        #[source]
        source: ReferenceError,
    },
}

/// Flat, resolved list of every token in a source tree, in source order.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    tokens: Vec<Token>,
}

impl Dictionary {
    /// Flatten `tree` and resolve every reference.
    pub fn from_tree(tree: &Value, keys: TokenKeys) -> Result<Self, TokenError> {
        let root = tree.as_object().ok_or(TokenError::RootNotObject)?;

        let mut tokens = Vec::new();
        collect_tokens(root, &mut Vec::new(), None, keys, &mut tokens);

        let mut resolver = ReferenceResolver::new();
        for token in &tokens {
            resolver.define(&token.dotted_path(), token.original.clone());
        }

        for token in &mut tokens {
            token.value = resolver
                .resolve(&token.original)
                .map_err(|source| TokenError::Reference { path: token.dotted_path(), source })?;
        }

        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Look up a token by dotted path.
    pub fn get(&self, dotted_path: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.dotted_path() == dotted_path)
    }
}

fn collect_tokens(
    group: &Map<String, Value>,
    path: &mut Vec<String>,
    inherited_type: Option<&str>,
    keys: TokenKeys,
    out: &mut Vec<Token>,
) {
    let group_type = group.get(keys.kind).and_then(Value::as_str).or(inherited_type);

    for (key, child) in group {
        if key.starts_with('$') {
            continue;
        }
        let Some(child_map) = child.as_object() else {
            continue;
        };

        path.push(key.clone());
        if let Some(value) = child_map.get(keys.value) {
            let token_type =
                child_map.get(keys.kind).and_then(Value::as_str).or(group_type).map(str::to_string);
            out.push(Token {
                path: path.clone(),
                name: path.join("-"),
                token_type,
                value: value.clone(),
                original: value.clone(),
                comment: child_map
                    .get(keys.description)
                    .and_then(Value::as_str)
                    .map(str::to_string),
                attributes: Attributes::default(),
            });
        } else {
            collect_tokens(child_map, path, group_type, keys, out);
        }
        path.pop();
    }
}

/// Deep-merge `source` into `target`.
///
/// Groups merge recursively; a token defined in both trees is replaced by the
/// one from `source` and reported in `collisions` by dotted path.
pub fn deep_merge(target: &mut Value, source: Value, keys: TokenKeys, collisions: &mut Vec<String>) {
    merge_at(target, source, keys, &mut Vec::new(), collisions);
}

fn merge_at(
    target: &mut Value,
    source: Value,
    keys: TokenKeys,
    path: &mut Vec<String>,
    collisions: &mut Vec<String>,
) {
    if keys.is_token(&source) || !target.is_object() || !source.is_object() {
        *target = source;
        return;
    }
    let (Value::Object(target_map), Value::Object(source_map)) = (target, source) else {
        return;
    };

    for (key, value) in source_map {
        path.push(key.clone());
        match target_map.get_mut(&key) {
            Some(existing) if existing.is_object() && !keys.is_token(existing) => {
                merge_at(existing, value, keys, path, collisions);
            }
            Some(existing) => {
                if keys.is_token(existing) {
                    collisions.push(path.join("."));
                }
                *existing = value;
            }
            None => {
                target_map.insert(key, value);
            }
        }
        path.pop();
    }
}
