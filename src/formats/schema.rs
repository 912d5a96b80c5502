//! Schema dumps
//!
//! The property tree as data: every property with its name, type (in annotation syntax), child
//! properties and, for collapsed wrappers, the inlined field.

use super::registry::SchemaFormat;
use crate::error::FormatError;
use crate::schema::Schema;

/// `schema-json`: pretty-printed JSON
pub struct JsonFormat;

impl SchemaFormat for JsonFormat {
    fn name(&self) -> &str {
        "schema-json"
    }

    fn description(&self) -> &str {
        "Property tree as JSON"
    }

    fn serialize(&self, schema: &Schema) -> Result<String, FormatError> {
        let mut json = serde_json::to_string_pretty(schema)
            .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}

/// `schema-yaml`: YAML
pub struct YamlFormat;

impl SchemaFormat for YamlFormat {
    fn name(&self) -> &str {
        "schema-yaml"
    }

    fn description(&self) -> &str {
        "Property tree as YAML"
    }

    fn serialize(&self, schema: &Schema) -> Result<String, FormatError> {
        serde_yaml::to_string(schema).map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}
