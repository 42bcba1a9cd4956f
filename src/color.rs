//! Color parsing and rendering for token values
//!
//! Parsing supports the following formats:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`, `oklch()`
//! - Named: `red`, `blue`, `transparent`, etc.
//!
//! Rendering covers the notations the output formats need: CSS `rgb()`/`rgba()`,
//! hex, Android `#AARRGGBB`, Compose `Color(0xAARRGGBB)` and UIColor components.

use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use std::fmt;
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

impl<T: fmt::Display> From<lightningcss::error::Error<T>> for ColorError {
    fn from(e: lightningcss::error::Error<T>) -> Self {
        ColorError::CssParse(e.to_string())
    }
}

/// An sRGB color with 8-bit channels and a fractional alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Create an opaque color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Replace the alpha channel.
    ///
    /// Values that are not finite or fall outside `[0, 1]` reset the color to
    /// fully opaque.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.a = if alpha.is_finite() && (0.0..=1.0).contains(&alpha) { alpha } else { 1.0 };
        self
    }

    /// Alpha rounded to two decimals, the precision used in CSS output.
    pub fn rounded_alpha(&self) -> f64 {
        (self.a * 100.0).round() / 100.0
    }

    /// Alpha as an 8-bit channel.
    pub fn alpha_u8(&self) -> u8 {
        (self.a * 255.0).round() as u8
    }

    /// Exactly opaque. Near-opaque alpha still renders as `rgba(.., 1)`.
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// `rgb(r, g, b)` when opaque, `rgba(r, g, b, a)` otherwise.
    ///
    /// ```
    /// use tokenpipe::color::Rgba;
    ///
    /// assert_eq!(Rgba::rgb(0, 0, 0).to_rgb_string(), "rgb(0, 0, 0)");
    /// assert_eq!(Rgba::rgb(255, 255, 255).with_alpha(0.5).to_rgb_string(), "rgba(255, 255, 255, 0.5)");
    /// ```
    pub fn to_rgb_string(&self) -> String {
        if self.is_opaque() {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                format_number(self.rounded_alpha())
            )
        }
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Hex when opaque, `rgba()` otherwise.
    pub fn to_css(&self) -> String {
        if self.is_opaque() {
            self.to_hex()
        } else {
            self.to_rgb_string()
        }
    }

    /// Android resource notation `#AARRGGBB`.
    pub fn to_hex8_android(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.alpha_u8(), self.r, self.g, self.b)
    }

    /// Jetpack Compose literal `Color(0xAARRGGBB)`.
    pub fn to_compose(&self) -> String {
        format!("Color(0x{:02x}{:02x}{:02x}{:02x})", self.alpha_u8(), self.r, self.g, self.b)
    }

    /// Swift `UIColor(red:green:blue:alpha:)` initializer.
    pub fn to_uicolor_swift(&self) -> String {
        format!(
            "UIColor(red: {:.3}, green: {:.3}, blue: {:.3}, alpha: {})",
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
            format_number(self.a)
        )
    }

    /// Objective-C `[UIColor colorWithRed:green:blue:alpha:]` message.
    pub fn to_uicolor_objc(&self) -> String {
        format!(
            "[UIColor colorWithRed:{:.3}f green:{:.3}f blue:{:.3}f alpha:{:.3}f]",
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
            self.a
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rgb_string())
    }
}

/// Render a number the way JSON and CSS print it: no trailing `.0` on whole
/// values and no negative zero.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    format!("{}", n)
}

/// Parse a CSS color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use tokenpipe::color::{parse_color, Rgba};
///
/// assert_eq!(parse_color("#F00").unwrap(), Rgba::rgb(255, 0, 0));
/// assert_eq!(parse_color("rgb(0, 255, 0)").unwrap(), Rgba::rgb(0, 255, 0));
/// assert_eq!(parse_color("blue").unwrap(), Rgba::rgb(0, 0, 255));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is invalid or unparseable.
pub fn parse_color(s: &str) -> Result<Rgba, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    // Fast path for hex colors
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    // lightningcss handles every other CSS color notation
    parse_css_color(s)
}

/// Parse a color and optionally override its alpha.
///
/// This is the call contract the gradient transform relies on: a color string
/// plus optional alpha in, an RGB(A) value out.
pub fn resolve_color(s: &str, alpha: Option<f64>) -> Result<Rgba, ColorError> {
    let color = parse_color(s)?;
    Ok(match alpha {
        Some(a) => color.with_alpha(a),
        None => color,
    })
}

/// Parse the digits of a hex color (without the leading '#')
fn parse_hex_color(hex: &str) -> Result<Rgba, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let digits: Vec<u8> = hex.bytes().map(hex_value).collect();
    let (r, g, b, a) = match digits.as_slice() {
        [r, g, b] => (r * 17, g * 17, b * 17, 255),
        [r, g, b, a] => (r * 17, g * 17, b * 17, a * 17),
        [r1, r2, g1, g2, b1, b2] => (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255),
        [r1, r2, g1, g2, b1, b2, a1, a2] => {
            (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, a1 * 16 + a2)
        }
        _ => return Err(ColorError::InvalidLength(digits.len())),
    };

    Ok(Rgba { r, g, b, a: f64::from(a) / 255.0 })
}

/// Value of an ASCII hex digit; callers have already validated the input
fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c - b'A' + 10,
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgba, ColorError> {
    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    css_color_to_rgba(css_color)
}

/// Convert a lightningcss CssColor to RGBA
fn css_color_to_rgba(color: CssColor) -> Result<Rgba, ColorError> {
    use lightningcss::values::color::FloatColor;

    let rgb_color = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba {
            r: rgba.red,
            g: rgba.green,
            b: rgba.blue,
            a: f64::from(rgba.alpha) / 255.0,
        }),
        // Float colors show up when components are 'none'
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgba {
                r: (rgb.r * 255.0).round() as u8,
                g: (rgb.g * 255.0).round() as u8,
                b: (rgb.b * 255.0).round() as u8,
                a: f64::from(rgb.alpha),
            }),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_lengths() {
        assert_eq!(parse_color("#f00").unwrap(), Rgba::rgb(255, 0, 0));
        assert_eq!(parse_color("#0a0a82").unwrap(), Rgba::rgb(10, 10, 130));

        let short_alpha = parse_color("#f008").unwrap();
        assert_eq!((short_alpha.r, short_alpha.alpha_u8()), (255, 0x88));

        let long_alpha = parse_color("#e97a484d").unwrap();
        assert_eq!((long_alpha.r, long_alpha.g, long_alpha.b), (0xe9, 0x7a, 0x48));
        assert_eq!(long_alpha.alpha_u8(), 0x4d);
    }

    #[test]
    fn test_parse_hex_errors() {
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert_eq!(parse_color("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_color("#zzz"), Err(ColorError::InvalidHex('z')));
    }

    #[test]
    fn test_parse_functional_and_named() {
        assert_eq!(parse_color("rgb(0, 255, 0)").unwrap(), Rgba::rgb(0, 255, 0));
        assert_eq!(parse_color("hsl(0, 100%, 50%)").unwrap(), Rgba::rgb(255, 0, 0));
        assert_eq!(parse_color("white").unwrap(), Rgba::rgb(255, 255, 255));

        let translucent = parse_color("rgba(0, 0, 0, 0.5)").unwrap();
        assert_eq!(translucent.rounded_alpha(), 0.5);
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(parse_color("not-a-color"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_rgb_string_rounds_alpha() {
        let c = Rgba::rgb(10, 10, 130).with_alpha(0.30196078431372547);
        assert_eq!(c.to_rgb_string(), "rgba(10, 10, 130, 0.3)");
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(0.0).to_rgb_string(), "rgba(1, 2, 3, 0)");
    }

    #[test]
    fn test_near_opaque_alpha_keeps_rgba() {
        let c = Rgba::rgb(255, 255, 255).with_alpha(0.999);
        assert!(!c.is_opaque());
        assert_eq!(c.to_rgb_string(), "rgba(255, 255, 255, 1)");
        assert_eq!(Rgba::rgb(255, 255, 255).with_alpha(1.0).to_rgb_string(), "rgb(255, 255, 255)");
    }

    #[test]
    fn test_with_alpha_out_of_range_is_opaque() {
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(1.5).a, 1.0);
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(-0.2).a, 1.0);
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(f64::NAN).a, 1.0);
    }

    #[test]
    fn test_resolve_color_overrides_alpha() {
        let c = resolve_color("#ffffff80", Some(1.0)).unwrap();
        assert_eq!(c.to_rgb_string(), "rgb(255, 255, 255)");
        let c = resolve_color("#ffffff", None).unwrap();
        assert!(c.is_opaque());
    }

    #[test]
    fn test_platform_notations() {
        let c = parse_color("#e97a484d").unwrap();
        assert_eq!(c.to_hex8_android(), "#4de97a48");
        assert_eq!(c.to_compose(), "Color(0x4de97a48)");
        assert_eq!(c.to_css(), "rgba(233, 122, 72, 0.3)");
        assert_eq!(parse_color("#CC0000").unwrap().to_css(), "#cc0000");
        assert_eq!(
            Rgba::rgb(255, 255, 255).to_uicolor_swift(),
            "UIColor(red: 1.000, green: 1.000, blue: 1.000, alpha: 1)"
        );
        assert_eq!(
            Rgba::rgb(0, 0, 0).to_uicolor_objc(),
            "[UIColor colorWithRed:0.000f green:0.000f blue:0.000f alpha:1.000f]"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(90.0), "90");
        assert_eq!(format_number(45.5), "45.5");
        assert_eq!(format_number(-0.0), "0");
    }
}
