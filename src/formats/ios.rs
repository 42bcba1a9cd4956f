//! Objective-C and Swift formats.

use super::{block_header, is_code_literal, literal, quoted, value_text, Format, FormatContext, FormatError};
use crate::tokens::Token;

fn objc_literal(token: &Token) -> String {
    let text = value_text(&token.value);
    if is_code_literal(token) {
        text
    } else {
        format!("@{}", quoted(&text))
    }
}

fn type_name<'a>(ctx: &'a FormatContext<'_>, format: &'static str) -> Result<&'a str, FormatError> {
    ctx.options.type_name.as_deref().ok_or(FormatError::MissingOption { format, option: "type" })
}

/// `#define Name value`
pub struct IosMacros;

impl Format for IosMacros {
    fn format_name(&self) -> &'static str {
        "ios/macros"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let mut out = block_header();
        out.push_str("#import <Foundation/Foundation.h>\n#import <UIKit/UIKit.h>\n\n");
        for token in ctx.tokens {
            out.push_str(&format!("#define {} {}\n", token.name, objc_literal(token)));
        }
        Ok(out)
    }
}

/// Color enum plus a class returning `UIColor` values by enum.
pub struct IosColorsH;

impl Format for IosColorsH {
    fn format_name(&self) -> &'static str {
        "ios/colors.h"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let kind = type_name(ctx, "ios/colors.h")?;
        let class = ctx.class_name();

        let mut out = block_header();
        out.push_str("#import <UIKit/UIKit.h>\n\n");
        out.push_str(&format!("typedef NS_ENUM(NSInteger, {}) {{\n", kind));
        let names: Vec<String> = ctx.tokens.iter().map(|t| format!("  {}", t.name)).collect();
        out.push_str(&names.join(",\n"));
        out.push_str("\n};\n\n");
        out.push_str(&format!("@interface {} : NSObject\n", class));
        out.push_str("+ (NSArray *)values;\n");
        out.push_str(&format!("+ (UIColor *)color:({})color;\n", kind));
        out.push_str("@end\n");
        Ok(out)
    }
}

pub struct IosColorsM;

impl Format for IosColorsM {
    fn format_name(&self) -> &'static str {
        "ios/colors.m"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let kind = type_name(ctx, "ios/colors.m")?;
        let class = ctx.class_name();

        let mut out = block_header();
        out.push_str(&format!("#import \"{}.h\"\n\n", class));
        out.push_str(&format!("@implementation {}\n\n", class));
        out.push_str(&format!("+ (UIColor *)color:({})colorEnum{{\n", kind));
        out.push_str("  return [[self values] objectAtIndex:colorEnum];\n}\n\n");
        out.push_str("+ (NSArray *)values {\n");
        out.push_str("  static NSArray* colorArray;\n");
        out.push_str("  static dispatch_once_t onceToken;\n\n");
        out.push_str("  dispatch_once(&onceToken, ^{\n");
        out.push_str("    colorArray = @[\n");
        let values: Vec<String> = ctx.tokens.iter().map(|t| format!("      {}", objc_literal(t))).collect();
        out.push_str(&values.join(",\n"));
        out.push_str("\n    ];\n  });\n\n");
        out.push_str("  return colorArray;\n}\n\n@end\n");
        Ok(out)
    }
}

/// `extern const <type> Name;`
pub struct IosStaticH;

impl Format for IosStaticH {
    fn format_name(&self) -> &'static str {
        "ios/static.h"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let kind = type_name(ctx, "ios/static.h")?;
        let mut out = block_header();
        out.push_str("#import <Foundation/Foundation.h>\n\n");
        for token in ctx.tokens {
            out.push_str(&format!("extern {} const {};\n", kind, token.name));
        }
        Ok(out)
    }
}

/// `<type> const Name = value;`
pub struct IosStaticM;

impl Format for IosStaticM {
    fn format_name(&self) -> &'static str {
        "ios/static.m"
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let kind = type_name(ctx, "ios/static.m")?;
        let mut out = block_header();
        out.push_str(&format!("#import \"{}.h\"\n\n", ctx.class_name()));
        for token in ctx.tokens {
            out.push_str(&format!("{} const {} = {};\n", kind, token.name, objc_literal(token)));
        }
        Ok(out)
    }
}

/// Swift type holding `static let` members.
///
/// `class.swift` and `enum.swift` fix the declaration kind; `any.swift`
/// reads it from the `objectType` option and also honors `accessControl`
/// and `imports`.
pub struct SwiftObject {
    name: &'static str,
    object_type: Option<&'static str>,
}

impl SwiftObject {
    pub fn class() -> Self {
        Self { name: "ios-swift/class.swift", object_type: Some("class") }
    }

    pub fn enumeration() -> Self {
        Self { name: "ios-swift/enum.swift", object_type: Some("enum") }
    }

    pub fn any() -> Self {
        Self { name: "ios-swift/any.swift", object_type: None }
    }
}

impl Format for SwiftObject {
    fn format_name(&self) -> &'static str {
        self.name
    }

    fn render(&self, ctx: &FormatContext<'_>) -> Result<String, FormatError> {
        let options = ctx.options;
        let object_type = match self.object_type {
            Some(fixed) => fixed,
            None => options.object_type.as_deref().unwrap_or("class"),
        };
        let access = match (self.object_type, options.access_control.as_deref()) {
            (None, Some(access)) => access,
            _ => "public",
        };
        let access_prefix = if access.is_empty() { String::new() } else { format!("{} ", access) };

        let mut out = block_header();
        if options.imports.is_empty() || self.object_type.is_some() {
            out.push_str("import UIKit\n\n");
        } else {
            for module in &options.imports {
                out.push_str(&format!("import {}\n", module));
            }
            out.push('\n');
        }
        out.push_str(&format!("{}{} {} {{\n", access_prefix, object_type, ctx.class_name()));
        for token in ctx.tokens {
            if let Some(comment) = &token.comment {
                out.push_str(&format!("    /** {} */\n", comment));
            }
            out.push_str(&format!("    {}static let {} = {}\n", access_prefix, token.name, literal(token)));
        }
        out.push_str("}\n");
        Ok(out)
    }
}
