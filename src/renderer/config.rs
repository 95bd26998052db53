//! Configuration for rendering

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::parser::Delimiters;

/// Errors that can occur when loading a render configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid delimiters '{open}' '{close}': markers must be non-empty and contain no whitespace")]
    InvalidDelimiters { open: String, close: String },
}

/// Configuration options for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Delimiters templates, partials and section lambda output start with
    pub delimiters: Delimiters,

    /// Whether `{{name}}` HTML-escapes its output
    pub escape_html: bool,

    /// Maximum nesting of partials and lambda re-renders; `None` is unbounded
    pub max_depth: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            delimiters: Delimiters::default(),
            escape_html: true,
            max_depth: None,
        }
    }
}

/// TOML structure for deserializing configs
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    delimiters: Option<TomlDelimiters>,
    escape_html: Option<bool>,
    max_depth: Option<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDelimiters {
    open: String,
    close: String,
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting delimiters
    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Enable or disable HTML escaping
    pub fn with_escape_html(mut self, escape: bool) -> Self {
        self.escape_html = escape;
        self
    }

    /// Limit the nesting depth of partials and lambdas
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Remove the nesting depth limit
    pub fn without_max_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(TomlDelimiters { open, close }) = parsed.delimiters {
            config.delimiters = Delimiters::new(open.as_str(), close.as_str())
                .ok_or(ConfigError::InvalidDelimiters { open, close })?;
        }
        if let Some(escape) = parsed.escape_html {
            config.escape_html = escape;
        }
        config.max_depth = parsed.max_depth;

        Ok(config)
    }
}
