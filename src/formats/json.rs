//! JSON formats.
//!
//! - `json`: the token tree with each leaf carrying its full token record
//! - `json/nested`: the token tree with each leaf reduced to its value

use serde_json::{json, Map, Value};

use super::{Format, FormatContext, FormatError};
use crate::tokens::Token;

fn insert_at(root: &mut Map<String, Value>, path: &[String], leaf: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut node = root;
    for segment in parents {
        let entry = node.entry(segment.clone()).or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        node = next;
    }
    node.insert(last.clone(), leaf);
}

fn pretty(tree: Map<String, Value>) -> Result<String, FormatError> {
    let mut out = serde_json::to_string_pretty(&Value::Object(tree))?;
    out.push('\n');
    Ok(out)
}

fn token_record(token: &Token) -> Value {
    let mut record = Map::new();
    record.insert("value".to_string(), token.value.clone());
    if let Some(kind) = &token.token_type {
        record.insert("type".to_string(), Value::String(kind.clone()));
    }
    if let Some(comment) = &token.comment {
        record.insert("comment".to_string(), Value::String(comment.clone()));
    }
    record.insert("name".to_string(), Value::String(token.name.clone()));
    let attributes = &token.attributes;
    let mut attrs = Map::new();
    for (key, value) in [
        ("category", &attributes.category),
        ("type", &attributes.kind),
        ("item", &attributes.item),
        ("subitem", &attributes.subitem),
        ("state", &attributes.state),
    ] {
        if let Some(value) = value {
            attrs.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    record.insert("attributes".to_string(), Value::Object(attrs));
    record.insert("path".to_string(), json!(token.path));
    Value::Object(record)
}

/// Token tree with full token records.
pub struct JsonFormat;

impl Format for JsonFormat {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let mut tree = Map::new();
        for token in ctx.tokens {
            insert_at(&mut tree, &token.path, token_record(token));
        }
        pretty(tree)
    }
}

/// Token tree with values only.
pub struct JsonNested;

impl Format for JsonNested {
    fn format_name(&self) -> &'static str {
        "json/nested"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let mut tree = Map::new();
        for token in ctx.tokens {
            insert_at(&mut tree, &token.path, token.value.clone());
        }
        pretty(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::FormatOptions;
    use super::*;

    fn render(format: &dyn Format, tokens: &[Token]) -> Value {
        let refs: Vec<&Token> = tokens.iter().collect();
        let options = FormatOptions::default();
        let ctx = FormatContext { tokens: &refs, dictionary: tokens, options: &options, destination: "t.json" };
        let text = format.render(&ctx).expect("format should render");
        serde_json::from_str(&text).expect("output should be valid JSON")
    }

    #[test]
    fn test_nested_values() {
        let tokens = [
            token(&["color", "red"], "color", json!("#ff0000")),
            token(&["color", "blue"], "color", json!("#0000ff")),
            token(&["space"], "dimension", json!("4px")),
        ];
        assert_eq!(
            render(&JsonNested, &tokens),
            json!({ "color": { "red": "#ff0000", "blue": "#0000ff" }, "space": "4px" })
        );
    }

    #[test]
    fn test_full_records() {
        let mut t = token(&["effects", "glow"], "gradient", json!("linear-gradient(90deg)"));
        t.attributes.category = Some("effects".to_string());
        let out = render(&JsonFormat, &[t]);

        let record = &out["effects"]["glow"];
        assert_eq!(record["value"], json!("linear-gradient(90deg)"));
        assert_eq!(record["type"], json!("gradient"));
        assert_eq!(record["attributes"]["category"], json!("effects"));
        assert_eq!(record["path"], json!(["effects", "glow"]));
    }

    #[test]
    fn test_key_order_follows_tokens() {
        let tokens = [token(&["z"], "color", json!("#000")), token(&["a"], "color", json!("#fff"))];
        let refs: Vec<&Token> = tokens.iter().collect();
        let options = FormatOptions::default();
        let ctx = FormatContext { tokens: &refs, dictionary: &tokens, options: &options, destination: "t.json" };
        let text = JsonNested.render(&ctx).unwrap();
        assert!(text.find("\"z\"").unwrap() < text.find("\"a\"").unwrap());
    }
}
