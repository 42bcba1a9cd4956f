//! CSS, SCSS, JavaScript and TypeScript formats.

use serde_json::Value;

use super::{block_header, value_text, Format, FormatContext, FormatError};
use crate::tokens::Token;

fn trailing_comment(token: &Token) -> String {
    match &token.comment {
        Some(comment) => format!(" /* {} */", comment),
        None => String::new(),
    }
}

/// `:root { --name: value; }`
pub struct CssVariables;

impl Format for CssVariables {
    fn format_name(&self) -> &'static str {
        "css/variables"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let mut out = block_header();
        out.push_str(":root {\n");
        for token in ctx.tokens {
            let value = match ctx.referenced_name(token) {
                Some(name) => format!("var(--{})", name),
                None => value_text(&token.value),
            };
            out.push_str(&format!("  --{}: {};{}\n", token.name, value, trailing_comment(token)));
        }
        out.push_str("}\n");
        Ok(out)
    }
}

/// `$name: value;`
pub struct ScssVariables;

impl Format for ScssVariables {
    fn format_name(&self) -> &'static str {
        "scss/variables"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let mut out = block_header();
        for token in ctx.tokens {
            let value = match ctx.referenced_name(token) {
                Some(name) => format!("${}", name),
                None => value_text(&token.value),
            };
            out.push_str(&format!("${}: {};{}\n", token.name, value, trailing_comment(token)));
        }
        Ok(out)
    }
}

/// `export const name = "value";`
pub struct JavascriptEs6;

impl Format for JavascriptEs6 {
    fn format_name(&self) -> &'static str {
        "javascript/es6"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let mut out = block_header();
        for token in ctx.tokens {
            if let Some(comment) = &token.comment {
                out.push_str(&format!("// {}\n", comment));
            }
            out.push_str(&format!("export const {} = {};\n", token.name, js_literal(&token.value)));
        }
        Ok(out)
    }
}

/// `export const name: string = "value";`
pub struct TypescriptEs6;

impl Format for TypescriptEs6 {
    fn format_name(&self) -> &'static str {
        "typescript/es6"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let mut out = block_header();
        for token in ctx.tokens {
            if let Some(comment) = &token.comment {
                out.push_str(&format!("/** {} */\n", comment));
            }
            let ts_type = match token.value {
                Value::Number(_) => "number",
                _ => "string",
            };
            out.push_str(&format!(
                "export const {}: {} = {};\n",
                token.name,
                ts_type,
                js_literal(&token.value)
            ));
        }
        Ok(out)
    }
}

/// Web transforms leave plain strings and numbers, so quoting depends only
/// on the JSON type.
fn js_literal(value: &Value) -> String {
    match value {
        Value::Number(_) => value_text(value),
        Value::String(s) => super::quoted(s),
        other => other.to_string(),
    }
}
