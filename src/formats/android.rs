//! Android resource XML and Jetpack Compose formats.

use super::{block_header, literal, value_text, Format, FormatContext, FormatError, GENERATED_NOTICE};
use crate::tokens::Token;

fn xml_header() -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\n<!--\n  {}\n-->\n", GENERATED_NOTICE)
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn resource_line(tag: &str, token: &Token) -> String {
    format!(
        "  <{tag} name=\"{}\">{}</{tag}>",
        token.name,
        xml_escape(&value_text(&token.value)),
        tag = tag
    )
}

fn resources(lines: Vec<String>) -> String {
    let mut out = xml_header();
    out.push_str("<resources>\n");
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("</resources>\n");
    out
}

/// `<color name="...">` entries.
pub struct AndroidColors;

impl Format for AndroidColors {
    fn format_name(&self) -> &'static str {
        "android/colors"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        Ok(resources(ctx.tokens.iter().map(|t| resource_line("color", t)).collect()))
    }
}

/// Mixed resources, with the tag chosen by token type.
pub struct AndroidResources;

impl AndroidResources {
    fn tag(token: &Token) -> &'static str {
        match token.token_type.as_deref() {
            Some("color") => "color",
            Some("dimension") => "dimen",
            _ => "string",
        }
    }
}

impl Format for AndroidResources {
    fn format_name(&self) -> &'static str {
        "android/resources"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        Ok(resources(ctx.tokens.iter().map(|t| resource_line(Self::tag(t), t)).collect()))
    }
}

/// Kotlin `object` holding Compose values.
pub struct ComposeObject;

impl Format for ComposeObject {
    fn format_name(&self) -> &'static str {
        "compose/object"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let package = ctx
            .options
            .package_name
            .as_deref()
            .ok_or(FormatError::MissingOption { format: "compose/object", option: "packageName" })?;

        let mut out = block_header();
        out.push_str(&format!("package {}\n\n", package));
        out.push_str("import androidx.compose.ui.graphics.Color\n");
        out.push_str("import androidx.compose.ui.unit.*\n\n");
        out.push_str(&format!("object {} {{\n", ctx.class_name()));
        for token in ctx.tokens {
            if let Some(comment) = &token.comment {
                out.push_str(&format!("  /** {} */\n", comment));
            }
            out.push_str(&format!("  val {} = {}\n", token.name, literal(token)));
        }
        out.push_str("}\n");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::FormatOptions;
    use super::*;
    use serde_json::json;

    fn render(format: &dyn Format, tokens: &[Token], options: &FormatOptions, destination: &str) -> Result<String, FormatError> {
        let refs: Vec<&Token> = tokens.iter().collect();
        let ctx = FormatContext { tokens: &refs, dictionary: tokens, options, destination };
        format.render(&ctx)
    }

    #[test]
    fn test_android_colors() {
        let t = named(token(&["color", "red"], "color", json!("#ffff0000")), "color_red");
        let out = render(&AndroidColors, &[t], &FormatOptions::default(), "colors.xml").unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("Do not edit directly, this file was auto-generated."));
        assert!(out.contains("<resources>\n  <color name=\"color_red\">#ffff0000</color>\n</resources>\n"));
    }

    #[test]
    fn test_android_resources_tags() {
        let tokens = [
            named(token(&["space"], "dimension", json!("8.00dp")), "space"),
            named(token(&["fade"], "duration", json!("0.20s")), "fade"),
        ];
        let out = render(&AndroidResources, &tokens, &FormatOptions::default(), "r.xml").unwrap();
        assert!(out.contains("<dimen name=\"space\">8.00dp</dimen>"));
        assert!(out.contains("<string name=\"fade\">0.20s</string>"));
    }

    #[test]
    fn test_xml_escaping() {
        let t = named(token(&["shadow"], "shadow", json!("a < b & c")), "shadow");
        let out = render(&AndroidResources, &[t], &FormatOptions::default(), "r.xml").unwrap();
        assert!(out.contains(">a &lt; b &amp; c<"));
    }

    #[test]
    fn test_compose_object() {
        let tokens = [
            named(token(&["color", "red"], "color", json!("Color(0xffff0000)")), "colorRed"),
            named(token(&["effects", "glow"], "gradient", json!("linear-gradient(90deg)")), "effectsGlow"),
        ];
        let options = FormatOptions { package_name: Some("com.example.tokens".to_string()), ..Default::default() };
        let out = render(&ComposeObject, &tokens, &options, "StyleDictionaryColor.kt").unwrap();

        assert!(out.contains("package com.example.tokens\n"));
        assert!(out.contains("object StyleDictionaryColor {\n"));
        assert!(out.contains("  val colorRed = Color(0xffff0000)\n"));
        assert!(out.contains("  val effectsGlow = \"linear-gradient(90deg)\"\n"));
    }

    #[test]
    fn test_compose_requires_package() {
        let err = render(&ComposeObject, &[], &FormatOptions::default(), "X.kt").unwrap_err();
        assert!(matches!(err, FormatError::MissingOption { option: "packageName", .. }));
    }
}
