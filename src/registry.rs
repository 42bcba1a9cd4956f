//! Registry of transforms, transform groups and formats
//!
//! The registry is assembled once before a build and then shared read-only by
//! every brand x platform job. Platform tables refer to its entries by name;
//! resolving an unknown name is an error.

use std::collections::HashMap;
use std::fmt;

use crate::formats::{builtin_formats, Format};
use crate::transforms::{Transform, BUILTIN_GROUPS, BUILTIN_TRANSFORMS};

/// Error when looking up a registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    UnknownTransform(String),
    UnknownTransformGroup(String),
    UnknownFormat(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownTransform(name) => write!(f, "Unknown transform '{}'", name),
            RegistryError::UnknownTransformGroup(name) => {
                write!(f, "Unknown transform group '{}'", name)
            }
            RegistryError::UnknownFormat(name) => write!(f, "Unknown format '{}'", name),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Named transforms, transform groups and formats.
#[derive(Default)]
pub struct Registry {
    transforms: HashMap<String, Transform>,
    groups: HashMap<String, Vec<String>>,
    formats: HashMap<String, Box<dyn Format>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats: Vec<_> = self.formats.keys().collect();
        formats.sort();
        f.debug_struct("Registry")
            .field("transforms", &self.transforms.len())
            .field("groups", &self.groups.len())
            .field("formats", &formats)
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in transform, group and format.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for transform in BUILTIN_TRANSFORMS {
            registry.register_transform(*transform);
        }
        for (name, members) in BUILTIN_GROUPS {
            registry.register_group(name, members.iter().map(|m| m.to_string()).collect());
        }
        for format in builtin_formats() {
            registry.register_format(format);
        }
        registry
    }

    /// Register a transform, replacing any with the same name.
    pub fn register_transform(&mut self, transform: Transform) {
        self.transforms.insert(transform.name.to_string(), transform);
    }

    pub fn register_group(&mut self, name: &str, transforms: Vec<String>) {
        self.groups.insert(name.to_string(), transforms);
    }

    pub fn register_format(&mut self, format: Box<dyn Format>) {
        self.formats.insert(format.format_name().to_string(), format);
    }

    pub fn transform(&self, name: &str) -> Result<&Transform, RegistryError> {
        self.transforms.get(name).ok_or_else(|| RegistryError::UnknownTransform(name.to_string()))
    }

    /// Transforms of a group, in application order.
    pub fn group(&self, name: &str) -> Result<Vec<&Transform>, RegistryError> {
        let members =
            self.groups.get(name).ok_or_else(|| RegistryError::UnknownTransformGroup(name.to_string()))?;
        members.iter().map(|member| self.transform(member)).collect()
    }

    pub fn format(&self, name: &str) -> Result<&dyn Format, RegistryError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| RegistryError::UnknownFormat(name.to_string()))
    }

    pub fn contains_transform(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    pub fn contains_format(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }
}
