//! Platform output tables
//!
//! Each platform names its transforms (a group or an explicit list) and the
//! files it writes. Every file selects tokens by `$type` (or takes all of
//! them) and renders them with a named format into
//! `<buildPathPrefix>/<brand>/<platform dir>/<destination>`.

use std::path::{Path, PathBuf};

use crate::formats::FormatOptions;

/// Every platform name accepted in configuration, in table order.
pub const KNOWN_PLATFORMS: &[&str] = &[
    "android",
    "compose",
    "css",
    "ios",
    "ios-swift",
    "ios-swift-separate-enums",
    "js",
    "json",
    "web",
];

/// Wildcard selecting every known platform.
pub const ALL_PLATFORMS: &str = "*";

/// How a platform picks its transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformSelection {
    /// A registered transform group
    Group(&'static str),
    /// An explicit list of transform names
    List(Vec<&'static str>),
}

/// One output file of a platform.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSpec {
    /// Path relative to the platform build directory
    pub destination: &'static str,
    /// Token `$type` to keep; `None` keeps every token
    pub filter: Option<&'static str>,
    pub format: &'static str,
    pub options: FormatOptions,
}

impl FileSpec {
    fn new(destination: &'static str, filter: Option<&'static str>, format: &'static str) -> Self {
        Self { destination, filter, format, options: FormatOptions::default() }
    }

    fn typed(destination: &'static str, kind: &'static str, format: &'static str) -> Self {
        Self::new(destination, Some(kind), format)
    }

    fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    fn with_references(mut self) -> Self {
        self.options.output_references = true;
        self
    }
}

/// Build description of one platform for one brand.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    pub name: String,
    /// Output directory for this brand and platform
    pub build_path: PathBuf,
    pub transforms: TransformSelection,
    pub files: Vec<FileSpec>,
}

/// Whether `name` is a known platform or the wildcard.
pub fn is_known_platform(name: &str) -> bool {
    name == ALL_PLATFORMS || KNOWN_PLATFORMS.contains(&name)
}

/// Expand the wildcard and drop duplicates, keeping first occurrence order.
pub fn expand_platforms(requested: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in requested {
        let names: Vec<&str> =
            if name == ALL_PLATFORMS { KNOWN_PLATFORMS.to_vec() } else { vec![name.as_str()] };
        for n in names {
            if !out.iter().any(|o| o == n) {
                out.push(n.to_string());
            }
        }
    }
    out
}

/// Platform configuration for `platform`, or `None` if it is unknown.
pub fn platform_config(platform: &str, brand: &str, build_path_prefix: &Path) -> Option<PlatformConfig> {
    let (dir, transforms, files) = match platform {
        "android" => ("android", TransformSelection::Group("android"), android_files()),
        "compose" => ("compose", TransformSelection::Group("compose"), compose_files()),
        "css" => ("css", TransformSelection::Group("custom/css"), css_files()),
        "ios" => ("ios", TransformSelection::Group("ios"), ios_files()),
        "ios-swift" => ("ios-swift", TransformSelection::Group("ios-swift"), ios_swift_files()),
        // Shares the ios-swift directory; file names do not overlap.
        "ios-swift-separate-enums" => {
            ("ios-swift", TransformSelection::Group("ios-swift-separate"), ios_swift_separate_files())
        }
        "js" => ("js", TransformSelection::Group("custom/js"), js_files()),
        "json" => ("json", TransformSelection::List(vec!["attribute/cti"]), json_files()),
        "web" => ("web", TransformSelection::Group("web"), web_files()),
        _ => return None,
    };
    Some(PlatformConfig {
        name: platform.to_string(),
        build_path: build_path_prefix.join(brand).join(dir),
        transforms,
        files,
    })
}

/// Configurations for every known platform.
pub fn all_platforms(brand: &str, build_path_prefix: &Path) -> Vec<PlatformConfig> {
    KNOWN_PLATFORMS
        .iter()
        .filter_map(|p| platform_config(p, brand, build_path_prefix))
        .collect()
}

/// The five token types every per-type table covers, with their file stem.
const TYPED_OUTPUTS: &[(&str, &str)] = &[
    ("color", "Color"),
    ("gradient", "Gradient"),
    ("dimension", "Dimension"),
    ("shadow", "Shadow"),
    ("duration", "Duration"),
];

fn class_options(class_name: &str) -> FormatOptions {
    FormatOptions { class_name: Some(class_name.to_string()), ..Default::default() }
}

fn android_files() -> Vec<FileSpec> {
    vec![
        FileSpec::typed("tokens.colors.xml", "color", "android/colors"),
        FileSpec::typed("tokens.gradients.xml", "gradient", "android/colors"),
        FileSpec::typed("tokens.dimensions.xml", "dimension", "android/resources"),
        FileSpec::typed("tokens.font_dimensions.xml", "dimension", "android/resources"),
        FileSpec::typed("tokens.shadows.xml", "shadow", "android/resources"),
        FileSpec::typed("tokens.durations.xml", "duration", "android/resources"),
    ]
}

fn compose_files() -> Vec<FileSpec> {
    const DESTINATIONS: [&str; 5] = [
        "StyleDictionaryColor.kt",
        "StyleDictionaryGradient.kt",
        "StyleDictionaryDimension.kt",
        "StyleDictionaryShadow.kt",
        "StyleDictionaryDuration.kt",
    ];
    TYPED_OUTPUTS
        .iter()
        .zip(DESTINATIONS)
        .map(|(&(kind, stem), destination)| {
            let class_name = format!("StyleDictionary{}", stem);
            FileSpec::typed(destination, kind, "compose/object").with_options(FormatOptions {
                package_name: Some(class_name.clone()),
                class_name: Some(class_name),
                ..Default::default()
            })
        })
        .collect()
}

fn css_files() -> Vec<FileSpec> {
    vec![
        FileSpec::typed("tokens.css", "color", "css/variables").with_references(),
        FileSpec::typed("gradients.css", "gradient", "css/variables"),
        FileSpec::typed("dimensions.css", "dimension", "css/variables"),
        FileSpec::typed("shadows.css", "shadow", "css/variables"),
        FileSpec::typed("durations.css", "duration", "css/variables"),
    ]
}

fn ios_files() -> Vec<FileSpec> {
    let colors = FormatOptions {
        type_name: Some("StyleDictionaryColorName".to_string()),
        ..class_options("StyleDictionaryColor")
    };
    let dimensions =
        FormatOptions { type_name: Some("float".to_string()), ..class_options("StyleDictionaryDimension") };
    vec![
        FileSpec::new("tokens.h", None, "ios/macros"),
        FileSpec::typed("StyleDictionaryColor.h", "color", "ios/colors.h").with_options(colors.clone()),
        FileSpec::typed("StyleDictionaryColor.m", "color", "ios/colors.m").with_options(colors),
        FileSpec::typed("StyleDictionaryDimension.h", "dimension", "ios/static.h")
            .with_options(dimensions.clone()),
        FileSpec::typed("StyleDictionaryDimension.m", "dimension", "ios/static.m")
            .with_options(dimensions),
    ]
}

fn ios_swift_files() -> Vec<FileSpec> {
    vec![
        FileSpec::new("StyleDictionary+Class.swift", None, "ios-swift/class.swift")
            .with_options(class_options("StyleDictionaryClass")),
        FileSpec::new("StyleDictionary+Enum.swift", None, "ios-swift/enum.swift")
            .with_options(class_options("StyleDictionaryEnum")),
        FileSpec::new("StyleDictionary+Struct.swift", None, "ios-swift/any.swift").with_options(
            FormatOptions {
                access_control: Some("internal".to_string()),
                imports: vec!["SwiftUI".to_string()],
                object_type: Some("struct".to_string()),
                ..class_options("StyleDictionaryStruct")
            },
        ),
    ]
}

fn ios_swift_separate_files() -> Vec<FileSpec> {
    const DESTINATIONS: [&str; 5] = [
        "StyleDictionaryColor.swift",
        "StyleDictionaryGradient.swift",
        "StyleDictionaryDimension.swift",
        "StyleDictionaryShadow.swift",
        "StyleDictionaryDuration.swift",
    ];
    TYPED_OUTPUTS
        .iter()
        .zip(DESTINATIONS)
        .map(|(&(kind, stem), destination)| {
            FileSpec::typed(destination, kind, "ios-swift/enum.swift")
                .with_options(class_options(&format!("StyleDictionary{}", stem)))
        })
        .collect()
}

fn js_files() -> Vec<FileSpec> {
    vec![
        FileSpec::typed("tokens.js", "color", "javascript/es6").with_references(),
        FileSpec::typed("tsTokens.ts", "color", "typescript/es6").with_references(),
        FileSpec::typed("gradients.js", "gradient", "javascript/es6"),
        FileSpec::typed("tsGradients.ts", "gradient", "typescript/es6"),
        FileSpec::typed("dimensions.js", "dimension", "javascript/es6"),
        FileSpec::typed("tsDimensions.ts", "dimension", "typescript/es6"),
        FileSpec::typed("shadows.js", "shadow", "javascript/es6"),
        FileSpec::typed("tsShadows.ts", "shadow", "typescript/es6"),
        FileSpec::typed("durations.js", "duration", "javascript/es6"),
        FileSpec::typed("tsDurations.ts", "duration", "typescript/es6"),
    ]
}

fn json_files() -> Vec<FileSpec> {
    vec![
        FileSpec::typed("tokens.json", "color", "json").with_references(),
        FileSpec::typed("tokensNested.json", "color", "json/nested").with_references(),
        FileSpec::typed("gradients.json", "gradient", "json").with_references(),
        FileSpec::typed("gradientsNested.json", "gradient", "json/nested").with_references(),
        FileSpec::typed("dimensions.json", "dimension", "json").with_references(),
        FileSpec::typed("dimensionsNested.json", "dimension", "json/nested").with_references(),
        FileSpec::typed("shadows.json", "shadow", "json").with_references(),
        FileSpec::typed("shadowsNested.json", "shadow", "json/nested").with_references(),
        FileSpec::typed("durations.json", "duration", "json").with_references(),
        FileSpec::typed("durationsNested.json", "duration", "json/nested").with_references(),
    ]
}

fn web_files() -> Vec<FileSpec> {
    vec![
        FileSpec::typed("tokens.scss", "color", "scss/variables"),
        FileSpec::typed("gradients.scss", "gradient", "scss/variables"),
        FileSpec::typed("dimensions.scss", "dimension", "scss/variables"),
        FileSpec::typed("shadows.scss", "shadow", "scss/variables"),
        FileSpec::typed("durations.scss", "duration", "scss/variables"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[test]
    fn test_known_platforms() {
        assert!(is_known_platform("css"));
        assert!(is_known_platform("*"));
        assert!(!is_known_platform("windows"));
        assert_eq!(KNOWN_PLATFORMS.len(), 9);
    }

    #[test]
    fn test_expand_wildcard() {
        let expanded = expand_platforms(&["css".to_string(), "*".to_string()]);
        assert_eq!(expanded.len(), 9);
        assert_eq!(expanded[0], "css");
    }

    #[test]
    fn test_build_path() {
        let config = platform_config("css", "dxn-default", Path::new("build")).unwrap();
        assert_eq!(config.build_path, PathBuf::from("build/dxn-default/css"));
        assert!(config.files[0].options.output_references);

        let separate = platform_config("ios-swift-separate-enums", "b", Path::new("out")).unwrap();
        assert_eq!(separate.build_path, PathBuf::from("out/b/ios-swift"));
    }

    #[test]
    fn test_unknown_platform() {
        assert!(platform_config("windows", "b", Path::new("build")).is_none());
    }

    #[test]
    fn test_every_table_entry_is_registered() {
        let registry = Registry::builtin();
        for platform in all_platforms("brand", Path::new("build")) {
            match &platform.transforms {
                TransformSelection::Group(group) => {
                    assert!(registry.group(group).is_ok(), "missing group {}", group)
                }
                TransformSelection::List(names) => {
                    for name in names {
                        assert!(registry.contains_transform(name), "missing transform {}", name);
                    }
                }
            }
            for file in &platform.files {
                assert!(registry.contains_format(file.format), "missing format {}", file.format);
            }
        }
    }

    #[test]
    fn test_compose_package_matches_class() {
        let compose = platform_config("compose", "b", Path::new("build")).unwrap();
        let first = &compose.files[0];
        assert_eq!(first.destination, "StyleDictionaryColor.kt");
        assert_eq!(first.options.package_name.as_deref(), Some("StyleDictionaryColor"));
        assert_eq!(first.options.class_name.as_deref(), Some("StyleDictionaryColor"));
    }
}
