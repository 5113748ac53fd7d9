//! Query construction configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};
use crate::translator::{Dialect, Translator};

/// How constant literals reach the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralPolicy {
    /// Rendered into the text as escaped literals
    #[default]
    Inline,
    /// Written to the binding store, placeholder in the text
    Parameterized,
}

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Target dialect
    pub dialect: Dialect,

    /// Literal rendering policy
    pub literals: LiteralPolicy,
}

impl QueryConfig {
    /// Create a new configuration builder
    pub fn builder() -> QueryConfigBuilder {
        QueryConfigBuilder::default()
    }

    pub fn from_toml_str(input: &str) -> QueryResult<Self> {
        toml::from_str(input).map_err(|e| QueryError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> QueryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// `<config dir>/querycraft/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("querycraft").join("config.toml"))
    }

    /// Load from the default path, or fall back to defaults when no file exists.
    pub fn discover() -> QueryResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn translator(&self) -> Arc<dyn Translator> {
        self.dialect.translator()
    }
}

/// Builder for QueryConfig
#[derive(Debug, Default)]
pub struct QueryConfigBuilder {
    config: QueryConfig,
}

impl QueryConfigBuilder {
    /// Set the dialect
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Bind literals instead of inlining them
    pub fn parameterized(mut self) -> Self {
        self.config.literals = LiteralPolicy::Parameterized;
        self
    }

    /// Build the configuration
    pub fn build(self) -> QueryConfig {
        self.config
    }
}
