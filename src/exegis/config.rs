//! Layered configuration
//!
//! `defaults/exegis.default.toml` is embedded into the binary. A user file and single-key
//! overrides (from command line flags) are layered on top with [`Loader`] before the result
//! is deserialized into [`ExegisConfig`].

use crate::exegis::template::Template;
use crate::exegis::walker::Layout;
use crate::exegis::xml::Indent;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../../defaults/exegis.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct ExegisConfig {
    pub layout: LayoutConfig,
    pub template: TemplateConfig,
    pub output: OutputConfig,
}

/// Indentation of the generated XML
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    pub indent_width: usize,
    pub base_offset: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    pub marker: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Where converted documents and error reports are written
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub xml_dir: PathBuf,
    pub errors_dir: PathBuf,
}

impl ExegisConfig {
    pub fn layout(&self) -> Layout {
        Layout {
            indent: Indent::spaces(self.layout.indent_width),
            base_offset: self.layout.base_offset,
        }
    }

    /// The configured template file, or the built-in one
    pub fn load_template(&self) -> io::Result<Template> {
        match &self.template.path {
            Some(path) => Template::from_file(path, self.template.marker.as_str()),
            None => Ok(Template::builtin(self.template.marker.as_str())),
        }
    }
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

    /// Apply a single key/value override, e.g. `layout.indent_width`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ExegisConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<ExegisConfig, ConfigError> {
    Loader::new().build()
}
