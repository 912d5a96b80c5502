//! Format registry for schema serialization
//!
//! Each output format implements [`SchemaFormat`] and is registered with [`FormatRegistry`]
//! under its name.

use crate::error::FormatError;
use crate::schema::Schema;
use std::collections::HashMap;

/// Trait for schema formats
pub trait SchemaFormat: Send + Sync {
    /// The name of this format (e.g., "schema-json", "go-structs")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// Serialize a normalized schema
    fn serialize(&self, schema: &Schema) -> Result<String, FormatError>;
}

/// Registry of schema formats
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn SchemaFormat>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: SchemaFormat + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn SchemaFormat, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Serialize a schema using the specified format
    pub fn serialize(&self, schema: &Schema, format: &str) -> Result<String, FormatError> {
        self.get(format)?.serialize(schema)
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(super::schema::JsonFormat);
        registry.register(super::schema::YamlFormat);
        registry.register(super::declarations::GoStructsFormat::default());

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
