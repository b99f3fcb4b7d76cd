use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoding::Encoding;
use crate::error::ConfigError;

/// Configuration for the diff presenter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// Whether rendered diffs carry ANSI color codes.
    pub color: bool,
    /// Unchanged lines shown around each change.
    pub context_lines: usize,
    /// Encoding both sides are converted to when their own encodings
    /// cannot be reconciled.
    pub default_external: Encoding,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            color: false,
            context_lines: 3,
            default_external: Encoding::Utf8,
        }
    }
}

impl PresenterConfig {
    /// Turn ANSI color codes on or off.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Set the number of unchanged lines shown around each change.
    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    /// Set the fallback encoding used when the inputs' encodings differ.
    pub fn with_default_external(mut self, encoding: Encoding) -> Self {
        self.default_external = encoding;
        self
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
