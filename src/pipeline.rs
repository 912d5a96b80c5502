//! Single-document conversion
//!
//! One unit of work: infer the schema from the raw source, normalize it, parse the markup,
//! rewrite it against the schema and render the result. Everything a conversion touches is
//! owned by it, so conversions of different documents can run on different threads.
//!
//! # Examples
//!
//! ```ignore
//! let converter = Converter::default();
//! let conversion = converter.convert(r#"<span class="svelte-title-">hello</span>"#)?;
//! assert_eq!(conversion.template, "<span>{ props.title }</span>\n");
//! ```

use crate::config::TemplateConfig;
use crate::dom::parse_fragment;
use crate::error::Error;
use crate::formats::{render_template, DEFAULT_INDENT};
use crate::rewrite::{Dialect, DocumentRewriter};
use crate::schema::{infer_schema, Schema};
use tracing::debug;

/// Result of converting one document
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The normalized schema
    pub schema: Schema,
    /// Rendered template body
    pub template: String,
}

#[derive(Debug, Clone)]
pub struct Converter {
    dialect: Dialect,
    indent: String,
}

impl Converter {
    pub fn new(dialect: Dialect, indent: impl Into<String>) -> Self {
        Converter {
            dialect,
            indent: indent.into(),
        }
    }

    pub fn from_config(config: &TemplateConfig) -> Self {
        Converter::new(config.dialect, config.indent.clone())
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn convert(&self, source: &str) -> Result<Conversion, Error> {
        let schema = infer_schema(source)?.normalized();
        debug!(
            properties = schema.properties.len(),
            "inferred schema"
        );

        let document = parse_fragment(source);
        let rewritten = DocumentRewriter::new(&schema, self.dialect).rewrite(&document)?;
        let template = render_template(&rewritten, &self.indent);

        Ok(Conversion { schema, template })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Converter::new(Dialect::default(), DEFAULT_INDENT)
    }
}
