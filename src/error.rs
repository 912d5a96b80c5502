//! Error types
//!
//! Every failure in this crate is fatal for the run: the input is expected to come from one
//! consistent server-rendering pass, so a marker that does not parse or a schema that does not
//! match the markup is a build defect to surface, not something to recover from.
//!
//! - [`MarkerError`]: a marker is malformed (bad type annotation, missing closing punctuation)
//! - [`SchemaError`]: a marker names a property or field the inferred schema does not have
//! - [`FormatError`]: an output format failed to serialize
//! - [`Error`]: everything above plus I/O, configuration and batch failures

use std::path::PathBuf;
use thiserror::Error;

/// A marker that cannot be tokenized into a property path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    /// The `{type}` suffix of a segment is not one of the known annotations
    #[error("invalid type annotation `{annotation}` in marker `{marker}`")]
    InvalidType { annotation: String, marker: String },

    /// The marker stops before its closing punctuation
    #[error("marker `{marker}` is missing its closing `{expected}`")]
    Unterminated {
        marker: String,
        expected: &'static str,
    },
}

/// The markup and the schema inferred from it disagree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("property `{path}` does not exist in the inferred schema")]
    UnknownProperty { path: String },

    #[error("property `{property}` has no field `{field}`")]
    UnknownField { property: String, field: String },

    #[error("property `{path}` is declared as `{declared}` but is also used as a composite")]
    ConflictingShape { path: String, declared: String },
}

/// Error that can occur while serializing a schema or template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to walk input directory: {0}")]
    Walk(#[from] ignore::Error),

    #[error("{}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("document task failed: {0}")]
    Task(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn in_document(self, path: impl Into<PathBuf>) -> Self {
        Error::Document {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
