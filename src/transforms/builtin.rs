//! Built-in transforms and transform groups

use serde_json::Value;

use super::case;
use super::gradient::transform_gradient;
use super::{any_token, Transform, TransformAction, TransformError, TransformOptions};
use crate::color::{format_number, parse_color, Rgba};
use crate::tokens::{Attributes, Token};

/// Every built-in transform, in registration order.
pub const BUILTIN_TRANSFORMS: &[Transform] = &[
    Transform::new("attribute/cti", any_token, TransformAction::Attribute(cti_attributes)),
    Transform::new("name/kebab", any_token, TransformAction::Name(kebab_name)),
    Transform::new("name/camel", any_token, TransformAction::Name(camel_name)),
    Transform::new("name/pascal", any_token, TransformAction::Name(pascal_name)),
    Transform::new("name/snake", any_token, TransformAction::Name(snake_name)),
    Transform::new("color/css", is_color, TransformAction::Value(color_css)),
    Transform::new("color/gradient", is_gradient, TransformAction::Value(color_gradient)),
    Transform::new("color/hex8android", is_color, TransformAction::Value(color_hex8_android)),
    Transform::new("color/composeColor", is_color, TransformAction::Value(color_compose)),
    Transform::new("color/UIColor", is_color, TransformAction::Value(color_uicolor_objc)),
    Transform::new("color/UIColorSwift", is_color, TransformAction::Value(color_uicolor_swift)),
    Transform::new("size/px", is_dimension, TransformAction::Value(size_px)),
    Transform::new("size/pxToRem", is_dimension, TransformAction::Value(size_px_to_rem)),
    Transform::new("size/dp", is_dimension, TransformAction::Value(size_dp)),
    Transform::new("size/compose/dp", is_dimension, TransformAction::Value(size_compose_dp)),
    Transform::new("size/float", is_dimension, TransformAction::Value(size_float)),
    Transform::new("size/swift/cgfloat", is_dimension, TransformAction::Value(size_swift_cgfloat)),
    Transform::new("time/seconds", is_duration, TransformAction::Value(time_seconds)),
    Transform::new("shadow/css/shorthand", is_shadow, TransformAction::Value(shadow_shorthand)),
];

/// Built-in transform groups as `(name, transforms)`.
pub const BUILTIN_GROUPS: &[(&str, &[&str])] = &[
    (
        "custom/css",
        &[
            "attribute/cti",
            "color/css",
            "color/gradient",
            "name/kebab",
            "time/seconds",
            "size/pxToRem",
            "shadow/css/shorthand",
        ],
    ),
    (
        "custom/js",
        &[
            "attribute/cti",
            "name/camel",
            "time/seconds",
            "color/css",
            "color/gradient",
            "size/pxToRem",
            "shadow/css/shorthand",
        ],
    ),
    (
        "web",
        &[
            "attribute/cti",
            "name/kebab",
            "size/px",
            "color/css",
            "color/gradient",
            "time/seconds",
            "shadow/css/shorthand",
        ],
    ),
    (
        "android",
        &[
            "attribute/cti",
            "name/snake",
            "color/hex8android",
            "color/gradient",
            "size/dp",
            "time/seconds",
            "shadow/css/shorthand",
        ],
    ),
    (
        "compose",
        &[
            "attribute/cti",
            "name/camel",
            "color/composeColor",
            "color/gradient",
            "size/compose/dp",
            "time/seconds",
            "shadow/css/shorthand",
        ],
    ),
    (
        "ios",
        &[
            "attribute/cti",
            "name/pascal",
            "color/UIColor",
            "color/gradient",
            "size/float",
            "time/seconds",
            "shadow/css/shorthand",
        ],
    ),
    (
        "ios-swift",
        &[
            "attribute/cti",
            "name/camel",
            "color/UIColorSwift",
            "color/gradient",
            "size/swift/cgfloat",
            "time/seconds",
            "shadow/css/shorthand",
        ],
    ),
    (
        "ios-swift-separate",
        &[
            "attribute/cti",
            "name/camel",
            "color/UIColorSwift",
            "color/gradient",
            "size/swift/cgfloat",
            "time/seconds",
            "shadow/css/shorthand",
        ],
    ),
];

fn is_color(token: &Token) -> bool {
    token.is_type("color")
}

fn is_gradient(token: &Token) -> bool {
    token.is_type("gradient")
}

fn is_dimension(token: &Token) -> bool {
    token.is_type("dimension")
}

fn is_duration(token: &Token) -> bool {
    token.is_type("duration")
}

fn is_shadow(token: &Token) -> bool {
    token.is_type("shadow")
}

fn cti_attributes(token: &Token) -> Attributes {
    let segment = |i: usize| token.path.get(i).cloned();
    Attributes {
        category: segment(0),
        kind: segment(1),
        item: segment(2),
        subitem: segment(3),
        state: segment(4),
    }
}

fn kebab_name(token: &Token) -> String {
    case::kebab(&token.path)
}

fn camel_name(token: &Token) -> String {
    case::camel(&token.path)
}

fn pascal_name(token: &Token) -> String {
    case::pascal(&token.path)
}

fn snake_name(token: &Token) -> String {
    case::snake(&token.path)
}

fn color_value(token: &Token, transform: &'static str) -> Result<Rgba, TransformError> {
    let text = token.value.as_str().ok_or_else(|| TransformError::UnexpectedValue {
        transform,
        message: format!("expected a color string, got {}", token.value),
    })?;
    parse_color(text).map_err(|source| TransformError::Color { value: text.to_string(), source })
}

fn color_css(token: &Token, _: &TransformOptions) -> Result<Value, TransformError> {
    Ok(Value::String(color_value(token, "color/css")?.to_css()))
}

fn color_gradient(token: &Token, _: &TransformOptions) -> Result<Value, TransformError> {
    Ok(Value::String(transform_gradient(&token.value)?))
}

fn color_hex8_android(token: &Token, _: &TransformOptions) -> Result<Value, TransformError> {
    Ok(Value::String(color_value(token, "color/hex8android")?.to_hex8_android()))
}

fn color_compose(token: &Token, _: &TransformOptions) -> Result<Value, TransformError> {
    Ok(Value::String(color_value(token, "color/composeColor")?.to_compose()))
}

fn color_uicolor_objc(token: &Token, _: &TransformOptions) -> Result<Value, TransformError> {
    Ok(Value::String(color_value(token, "color/UIColor")?.to_uicolor_objc()))
}

fn color_uicolor_swift(token: &Token, _: &TransformOptions) -> Result<Value, TransformError> {
    Ok(Value::String(color_value(token, "color/UIColorSwift")?.to_uicolor_swift()))
}

/// Split a dimension into its number and unit: `16` and `"16px"` give
/// `(16, "")` and `(16, "px")`.
pub fn parse_dimension(value: &Value) -> Option<(f64, String)> {
    match value {
        Value::Number(n) => n.as_f64().map(|n| (n, String::new())),
        Value::String(s) => {
            let s = s.trim();
            let split = s
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
                .map_or(s.len(), |(i, _)| i);
            let number = s[..split].parse::<f64>().ok()?;
            Some((number, s[split..].trim().to_string()))
        }
        _ => None,
    }
}

fn dimension(token: &Token, transform: &'static str) -> Result<(f64, String), TransformError> {
    parse_dimension(&token.value).ok_or_else(|| TransformError::UnexpectedValue {
        transform,
        message: format!("expected a dimension, got {}", token.value),
    })
}

fn is_pixels(unit: &str) -> bool {
    unit.is_empty() || unit == "px"
}

fn size_px(token: &Token, _: &TransformOptions) -> Result<Value, TransformError> {
    let (n, unit) = dimension(token, "size/px")?;
    if !is_pixels(&unit) {
        return Ok(token.value.clone());
    }
    Ok(Value::String(format!("{}px", format_number(n))))
}

fn size_px_to_rem(token: &Token, options: &TransformOptions) -> Result<Value, TransformError> {
    let (n, unit) = dimension(token, "size/pxToRem")?;
    if !is_pixels(&unit) {
        return Ok(token.value.clone());
    }
    if n == 0.0 {
        return Ok(Value::String("0".to_string()));
    }
    Ok(Value::String(format!("{}rem", format_number(n / options.base_px_font_size))))
}

/// Pixels, or rem scaled by the base font size, as a plain number.
fn pixels(token: &Token, options: &TransformOptions, transform: &'static str) -> Result<f64, TransformError> {
    let (n, unit) = dimension(token, transform)?;
    match unit.as_str() {
        "" | "px" | "dp" | "pt" => Ok(n),
        "rem" | "em" => Ok(n * options.base_px_font_size),
        other => Err(TransformError::UnexpectedValue {
            transform,
            message: format!("unsupported unit '{}'", other),
        }),
    }
}

fn size_dp(token: &Token, options: &TransformOptions) -> Result<Value, TransformError> {
    Ok(Value::String(format!("{:.2}dp", pixels(token, options, "size/dp")?)))
}

fn size_compose_dp(token: &Token, options: &TransformOptions) -> Result<Value, TransformError> {
    Ok(Value::String(format!("{}.dp", format_number(pixels(token, options, "size/compose/dp")?))))
}

fn size_float(token: &Token, options: &TransformOptions) -> Result<Value, TransformError> {
    Ok(Value::String(format!("{:.2}", pixels(token, options, "size/float")?)))
}

fn size_swift_cgfloat(token: &Token, options: &TransformOptions) -> Result<Value, TransformError> {
    Ok(Value::String(format!("CGFloat({:.2})", pixels(token, options, "size/swift/cgfloat")?)))
}

fn time_seconds(token: &Token, _: &TransformOptions) -> Result<Value, TransformError> {
    let (n, unit) = parse_dimension(&token.value).ok_or_else(|| TransformError::UnexpectedValue {
        transform: "time/seconds",
        message: format!("expected a duration, got {}", token.value),
    })?;
    let seconds = match unit.as_str() {
        "" | "ms" => n / 1000.0,
        "s" => n,
        other => {
            return Err(TransformError::UnexpectedValue {
                transform: "time/seconds",
                message: format!("unsupported unit '{}'", other),
            })
        }
    };
    Ok(Value::String(format!("{:.2}s", seconds)))
}

fn shadow_shorthand(token: &Token, _: &TransformOptions) -> Result<Value, TransformError> {
    let layers = match &token.value {
        Value::Array(items) => items.iter().map(shadow_layer).collect::<Result<Vec<_>, _>>()?,
        Value::Object(_) => vec![shadow_layer(&token.value)?],
        Value::String(_) => return Ok(token.value.clone()),
        other => {
            return Err(TransformError::UnexpectedValue {
                transform: "shadow/css/shorthand",
                message: format!("expected a shadow object, got {}", other),
            })
        }
    };
    Ok(Value::String(layers.join(", ")))
}

fn shadow_layer(layer: &Value) -> Result<String, TransformError> {
    let Some(map) = layer.as_object() else {
        return Err(TransformError::UnexpectedValue {
            transform: "shadow/css/shorthand",
            message: format!("expected a shadow layer object, got {}", layer),
        });
    };

    let length = |key: &str| match map.get(key) {
        Some(Value::Number(n)) => n.as_f64().map(|n| match n {
            n if n == 0.0 => "0".to_string(),
            n => format!("{}px", format_number(n)),
        }),
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };

    let mut parts = Vec::new();
    if map.get("inset").and_then(Value::as_bool) == Some(true) {
        parts.push("inset".to_string());
    }
    for key in ["offsetX", "offsetY", "blur", "spread"] {
        parts.push(length(key).unwrap_or_else(|| "0".to_string()));
    }
    if let Some(color) = map.get("color").and_then(Value::as_str) {
        parts.push(color.to_string());
    }
    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(path: &[&str], kind: &str, value: Value) -> Token {
        let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        Token {
            name: path.join("-"),
            path,
            token_type: Some(kind.to_string()),
            original: value.clone(),
            value,
            comment: None,
            attributes: Attributes::default(),
        }
    }

    fn find(name: &str) -> &'static Transform {
        BUILTIN_TRANSFORMS.iter().find(|t| t.name == name).expect("transform should exist")
    }

    fn run(name: &str, mut t: Token) -> Value {
        find(name).apply(&mut t, &TransformOptions::default()).expect("transform should succeed");
        t.value
    }

    #[test]
    fn test_group_members_are_registered() {
        for (group, members) in BUILTIN_GROUPS {
            for member in *members {
                assert!(
                    BUILTIN_TRANSFORMS.iter().any(|t| t.name == *member),
                    "group {} lists unknown transform {}",
                    group,
                    member
                );
            }
        }
    }

    #[test]
    fn test_cti_attributes() {
        let mut t = token(&["color", "background", "button", "primary", "active"], "color", json!("#fff"));
        find("attribute/cti").apply(&mut t, &TransformOptions::default()).unwrap();
        assert_eq!(t.attributes.category.as_deref(), Some("color"));
        assert_eq!(t.attributes.kind.as_deref(), Some("background"));
        assert_eq!(t.attributes.state.as_deref(), Some("active"));
    }

    #[test]
    fn test_name_transforms() {
        let mut t = token(&["effects", "glowAlert"], "gradient", json!({}));
        find("name/camel").apply(&mut t, &TransformOptions::default()).unwrap();
        assert_eq!(t.name, "effectsGlowAlert");
        find("name/snake").apply(&mut t, &TransformOptions::default()).unwrap();
        assert_eq!(t.name, "effects_glow_alert");
    }

    #[test]
    fn test_color_transforms() {
        let red = || token(&["red"], "color", json!("#ff000080"));
        assert_eq!(run("color/css", red()), json!("rgba(255, 0, 0, 0.5)"));
        assert_eq!(run("color/hex8android", red()), json!("#80ff0000"));
        assert_eq!(run("color/composeColor", red()), json!("Color(0x80ff0000)"));
        assert_eq!(run("color/css", token(&["a"], "color", json!("rgb(0, 0, 255)"))), json!("#0000ff"));
    }

    #[test]
    fn test_matcher_skips_other_types() {
        let t = token(&["space"], "dimension", json!("4px"));
        assert_eq!(run("color/css", t), json!("4px"));
    }

    #[test]
    fn test_gradient_transform() {
        let t = token(
            &["effects", "glow"],
            "gradient",
            json!({
                "type": "linear",
                "angle": 90,
                "stops": [
                    { "color": "#ff0000", "position": "0%" },
                    { "color": "#0000ff", "alpha": 0.5, "position": "100%" }
                ]
            }),
        );
        assert_eq!(
            run("color/gradient", t),
            json!("linear-gradient(90deg, rgb(255, 0, 0) 0%, rgba(0, 0, 255, 0.5) 100%)")
        );
    }

    #[test]
    fn test_invalid_color_is_an_error() {
        let mut t = token(&["bad"], "color", json!("not-a-color"));
        let err = find("color/css").apply(&mut t, &TransformOptions::default()).unwrap_err();
        assert!(matches!(err, TransformError::Color { .. }));
    }

    #[test]
    fn test_size_transforms() {
        assert_eq!(run("size/pxToRem", token(&["s"], "dimension", json!("24px"))), json!("1.5rem"));
        assert_eq!(run("size/pxToRem", token(&["s"], "dimension", json!(0))), json!("0"));
        assert_eq!(run("size/pxToRem", token(&["s"], "dimension", json!("50%"))), json!("50%"));
        assert_eq!(run("size/px", token(&["s"], "dimension", json!(4))), json!("4px"));
        assert_eq!(run("size/dp", token(&["s"], "dimension", json!("8px"))), json!("8.00dp"));
        assert_eq!(run("size/compose/dp", token(&["s"], "dimension", json!("8px"))), json!("8.dp"));
        assert_eq!(
            run("size/swift/cgfloat", token(&["s"], "dimension", json!("1rem"))),
            json!("CGFloat(16.00)")
        );
    }

    #[test]
    fn test_base_font_size_option() {
        let mut t = token(&["s"], "dimension", json!("20px"));
        find("size/pxToRem").apply(&mut t, &TransformOptions { base_px_font_size: 10.0 }).unwrap();
        assert_eq!(t.value, json!("2rem"));
    }

    #[test]
    fn test_time_seconds() {
        assert_eq!(run("time/seconds", token(&["d"], "duration", json!("200ms"))), json!("0.20s"));
        assert_eq!(run("time/seconds", token(&["d"], "duration", json!(1500))), json!("1.50s"));
        assert_eq!(run("time/seconds", token(&["d"], "duration", json!("0.3s"))), json!("0.30s"));
    }

    #[test]
    fn test_shadow_shorthand() {
        let t = token(
            &["shadow", "card"],
            "shadow",
            json!([
                { "offsetX": "0px", "offsetY": 2, "blur": "4px", "spread": 0, "color": "#00000040" },
                { "inset": true, "offsetX": 1, "offsetY": 1, "blur": 0, "spread": 0, "color": "red" }
            ]),
        );
        assert_eq!(run("shadow/css/shorthand", t), json!("0px 2px 4px 0 #00000040, inset 1px 1px 0 0 red"));
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension(&json!("16px")), Some((16.0, "px".to_string())));
        assert_eq!(parse_dimension(&json!("-0.5rem")), Some((-0.5, "rem".to_string())));
        assert_eq!(parse_dimension(&json!(3)), Some((3.0, String::new())));
        assert_eq!(parse_dimension(&json!("auto")), None);
    }
}
