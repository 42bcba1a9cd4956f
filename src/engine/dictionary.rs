//! Built-in engine: merge fragments, flatten, transform, render.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::{EngineError, EngineOptions, PlatformOutput, TokenEngine, TokenSource};
use crate::formats::FormatContext;
use crate::platforms::{PlatformConfig, TransformSelection};
use crate::registry::Registry;
use crate::tokens::{deep_merge, Dictionary, Token, TokenKeys};
use crate::transforms::{Transform, TransformOptions};

/// Engine that builds platforms from a flattened token [`Dictionary`].
#[derive(Debug, Clone, Default)]
pub struct DictionaryEngine {
    options: EngineOptions,
}

impl DictionaryEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn keys(&self) -> TokenKeys {
        TokenKeys::for_format(self.options.uses_dtcg)
    }
}

/// Read one fragment; `.json5` files go through the JSON5 parser.
fn read_fragment(path: &Path) -> Result<Value, EngineError> {
    let text = fs::read_to_string(path)
        .map_err(|source| EngineError::Io { path: path.to_path_buf(), source })?;

    let is_json5 = path.extension().and_then(|e| e.to_str()) == Some("json5");
    let value: Value = if is_json5 {
        json5::from_str(&text)
            .map_err(|e| EngineError::Parse { path: path.to_path_buf(), message: e.to_string() })?
    } else {
        serde_json::from_str(&text)
            .map_err(|e| EngineError::Parse { path: path.to_path_buf(), message: e.to_string() })?
    };

    if !value.is_object() {
        return Err(EngineError::SourceNotObject(path.to_path_buf()));
    }
    Ok(value)
}

fn resolve_transforms<'r>(
    selection: &TransformSelection,
    registry: &'r Registry,
) -> Result<Vec<&'r Transform>, EngineError> {
    match selection {
        TransformSelection::Group(group) => Ok(registry.group(group)?),
        TransformSelection::List(names) => names
            .iter()
            .map(|name| registry.transform(name).map_err(EngineError::from))
            .collect(),
    }
}

impl TokenEngine for DictionaryEngine {
    fn load(&self, fragments: &[PathBuf]) -> Result<TokenSource, EngineError> {
        let keys = self.keys();
        let mut sorted = fragments.to_vec();
        sorted.sort();

        let mut tree = Value::Object(serde_json::Map::new());
        let mut warnings = Vec::new();
        for path in &sorted {
            let fragment = read_fragment(path)?;
            let mut collisions = Vec::new();
            deep_merge(&mut tree, fragment, keys, &mut collisions);
            for token in collisions {
                let warning = format!("Token collision: '{}' redefined by {}", token, path.display());
                log::debug!("{}", warning);
                warnings.push(warning);
            }
        }

        log::debug!("Merged {} fragment(s)", sorted.len());
        Ok(TokenSource { tree, fragments: sorted, warnings })
    }

    fn build_platform(
        &self,
        source: &TokenSource,
        platform: &PlatformConfig,
        registry: &Registry,
    ) -> Result<PlatformOutput, EngineError> {
        let transforms = resolve_transforms(&platform.transforms, registry)?;
        let formats = platform
            .files
            .iter()
            .map(|file| registry.format(file.format))
            .collect::<Result<Vec<_>, _>>()?;

        let mut dictionary = Dictionary::from_tree(&source.tree, self.keys())?;
        let transform_options = TransformOptions { base_px_font_size: self.options.base_px_font_size };
        for token in dictionary.tokens_mut() {
            for transform in &transforms {
                transform
                    .apply(token, &transform_options)
                    .map_err(|source| EngineError::Transform { token: token.dotted_path(), source })?;
            }
        }

        fs::create_dir_all(&platform.build_path)
            .map_err(|source| EngineError::Io { path: platform.build_path.clone(), source })?;

        let mut output = PlatformOutput::default();
        for (file, format) in platform.files.iter().zip(formats) {
            let selected: Vec<&Token> = dictionary
                .tokens()
                .iter()
                .filter(|t| file.filter.map_or(true, |kind| t.is_type(kind)))
                .collect();

            if selected.is_empty() {
                output.warnings.push(format!(
                    "No tokens for {}/{}. File not created.",
                    platform.name, file.destination
                ));
                continue;
            }

            let ctx = FormatContext {
                tokens: &selected,
                dictionary: dictionary.tokens(),
                options: &file.options,
                destination: file.destination,
            };
            let contents = format.render(&ctx).map_err(|source| EngineError::Format {
                destination: file.destination.to_string(),
                source,
            })?;

            let path = platform.build_path.join(file.destination);
            fs::write(&path, contents).map_err(|source| EngineError::Io { path: path.clone(), source })?;
            log::debug!("Wrote {}", path.display());
            output.files.push(path);
        }

        Ok(output)
    }
}
