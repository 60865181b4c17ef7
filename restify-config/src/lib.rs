//! Shared configuration loader for the restify toolchain.
//!
//! `defaults/restify.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files
//! on top of those defaults via [`Loader`] before deserializing into
//! [`RestifyConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use restify_convert::{ConvertOptions, LiteralTokens};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/restify.default.toml");

/// Top-level configuration consumed by restify applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RestifyConfig {
    pub convert: ConvertConfig,
    pub batch: BatchConfig,
    pub open: OpenConfig,
}

/// Knobs for the conversion engine itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub literal_tokens: Vec<String>,
}

impl From<&ConvertConfig> for ConvertOptions {
    fn from(config: &ConvertConfig) -> Self {
        ConvertOptions {
            literal_tokens: LiteralTokens::new(config.literal_tokens.clone()),
        }
    }
}

impl From<ConvertConfig> for ConvertOptions {
    fn from(config: ConvertConfig) -> Self {
        ConvertOptions {
            literal_tokens: LiteralTokens::new(config.literal_tokens),
        }
    }
}

/// Batch-orchestration locations and limits.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    pub source_prefix: String,
    pub source_extension: String,
    pub output_dir: String,
    pub backup_dir: String,
    pub copy_limit: usize,
}

/// Where rendered documents are served for `restify open`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenConfig {
    pub base_url: String,
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
    pub fn build(self) -> Result<RestifyConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RestifyConfig, ConfigError> {
    Loader::new().build()
}
