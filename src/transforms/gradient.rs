//! Gradient value transform
//!
//! Renders a gradient token value such as
//!
//! ```json
//! { "type": "linear", "angle": 90, "stops": [
//!     { "color": "#000000", "position": "0%" },
//!     { "color": "#ffffff", "alpha": 0.5, "position": "100%" }
//! ] }
//! ```
//!
//! into CSS gradient syntax:
//! `linear-gradient(90deg, rgb(0, 0, 0) 0%, rgba(255, 255, 255, 0.5) 100%)`.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::color::{format_number, resolve_color, ColorError};

/// Gradient kinds accepted in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Angular,
    Conic,
}

impl GradientKind {
    /// Parse a `type` field value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "linear" => Some(Self::Linear),
            "radial" => Some(Self::Radial),
            "angular" => Some(Self::Angular),
            "conic" => Some(Self::Conic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Radial => "radial",
            Self::Angular => "angular",
            Self::Conic => "conic",
        }
    }
}

impl fmt::Display for GradientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for gradient token values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradientError {
    /// The value itself is not an object
    #[error("Invalid gradient value: expected an object, got {0}")]
    NotAnObject(&'static str),
    /// `type` is not one of linear, radial, angular, conic
    #[error("Invalid gradient type: {0}. It should be either 'linear' or 'radial' or 'angular' or 'conic'.")]
    InvalidType(String),
    /// `angle` is missing or not a number
    #[error("Invalid gradient angle type: {0}. It should be a number.")]
    InvalidAngle(&'static str),
    /// `stops` is missing or not a list of objects
    #[error("Invalid gradient stops: {0}")]
    InvalidStops(String),
    /// A stop's `alpha` is present but not a number
    #[error("Invalid gradient alpha type: {0}. It should be a number.")]
    InvalidAlpha(&'static str),
    /// A stop's `color` cannot be parsed
    #[error("Invalid gradient stop color '{color}': {source}")]
    InvalidColor {
        color: String,
        #[source]
        source: ColorError,
    },
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Transform a gradient token value into a CSS gradient string.
///
/// Validation happens field by field in the order type, angle, then each stop;
/// the first invalid field fails the whole value.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tokenpipe::transforms::gradient::transform_gradient;
///
/// let value = json!({
///     "angle": 180,
///     "stops": [
///         { "color": "red", "position": "0%" },
///         { "color": "blue", "position": "100%" }
///     ]
/// });
/// assert_eq!(
///     transform_gradient(&value).unwrap(),
///     "linear-gradient(180deg, rgb(255, 0, 0) 0%, rgb(0, 0, 255) 100%)"
/// );
/// ```
pub fn transform_gradient(value: &Value) -> Result<String, GradientError> {
    let obj = value.as_object().ok_or_else(|| GradientError::NotAnObject(json_type_name(value)))?;

    let kind = match obj.get("type") {
        None => GradientKind::default(),
        Some(Value::String(s)) => {
            GradientKind::parse(s).ok_or_else(|| GradientError::InvalidType(s.clone()))?
        }
        Some(other) => return Err(GradientError::InvalidType(other.to_string())),
    };

    let angle = match obj.get("angle") {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or(GradientError::InvalidAngle("number"))?,
        Some(other) => return Err(GradientError::InvalidAngle(json_type_name(other))),
        None => return Err(GradientError::InvalidAngle("undefined")),
    };

    let stops = match obj.get("stops") {
        Some(Value::Array(stops)) => stops,
        Some(other) => {
            return Err(GradientError::InvalidStops(format!(
                "expected an array, got {}",
                json_type_name(other)
            )))
        }
        None => return Err(GradientError::InvalidStops("missing 'stops'".to_string())),
    };

    let mut out = format!("{}-gradient({}deg", kind, format_number(angle));
    for (index, stop) in stops.iter().enumerate() {
        out.push_str(", ");
        out.push_str(&render_stop(index, stop)?);
    }
    out.push(')');

    Ok(out)
}

/// Render one `<color> <position>` term.
fn render_stop(index: usize, stop: &Value) -> Result<String, GradientError> {
    let stop = stop.as_object().ok_or_else(|| {
        GradientError::InvalidStops(format!(
            "stop {} must be an object, got {}",
            index,
            json_type_name(stop)
        ))
    })?;

    let alpha = match stop.get("alpha") {
        None => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => return Err(GradientError::InvalidAlpha(json_type_name(other))),
    };

    let color = match stop.get("color") {
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(GradientError::InvalidStops(format!(
                "stop {} color must be a string, got {}",
                index,
                json_type_name(other)
            )))
        }
        None => {
            return Err(GradientError::InvalidStops(format!("stop {} has no color", index)))
        }
    };

    let rgba = resolve_color(color, alpha)
        .map_err(|source| GradientError::InvalidColor { color: color.to_string(), source })?;

    // Positions pass through untouched
    let position = match stop.get("position") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    if position.is_empty() {
        Ok(rgba.to_rgb_string())
    } else {
        Ok(format!("{} {}", rgba.to_rgb_string(), position))
    }
}
