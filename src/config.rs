//! Configuration loader
//!
//! `defaults/ssr2templ.default.toml` is embedded into the binary so that docs and runtime
//! behavior stay in sync. User files and command-line flags are layered on top of those
//! defaults via [`Loader`] before deserializing into [`Ssr2TemplConfig`].

use crate::rewrite::Dialect;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/ssr2templ.default.toml");

/// File picked up from the working directory when present
pub const LOCAL_CONFIG_FILE: &str = "ssr2templ.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Ssr2TemplConfig {
    pub template: TemplateConfig,
    pub component: ComponentConfig,
    pub build: BuildConfig,
}

/// How the template body is written.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    pub dialect: Dialect,
    pub indent: String,
}

/// Names used by the generated component frame.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    pub marshal_fn: String,
    pub head_fn: String,
    pub wrapper_tag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    pub source_extension: String,
    pub head_extension: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<Ssr2TemplConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Ssr2TemplConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.template.dialect, Dialect::Templ);
        assert_eq!(config.template.indent, "  ");
        assert_eq!(config.component.name, "Home");
        assert_eq!(config.component.marshal_fn, "marshalProps");
        assert_eq!(config.build.head_extension, "head");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("template.dialect", "generic")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.template.dialect, Dialect::Generic);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[component]\nname = \"Landing\"").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.component.name, "Landing");
        assert_eq!(config.component.head_fn, "addHeadContent");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/ssr2templ.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.build.source_extension, "html");
    }

    #[test]
    fn rejects_unknown_dialect() {
        let result = Loader::new()
            .set_override("template.dialect", "jinja")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
