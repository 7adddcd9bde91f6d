//! Engine configuration via `shelter.toml`
//!
//! Settings are fixed when a collection is opened. Invalid values fail the
//! open with a configuration error; nothing is re-validated per call.

use serde::{Deserialize, Serialize};
use std::path::Path;

use shelter_core::{Error, Result};

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "shelter.toml";

/// Default query cache capacity, in distinct normalized queries.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Default indexed field.
pub const DEFAULT_INDEX_FIELD: &str = "breed";

/// Collection configuration.
///
/// # Example
///
/// ```toml
/// # Maximum number of distinct queries kept in the result cache
/// cache_capacity = 128
///
/// # Record field maintained in the attribute index
/// index_field = "breed"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum entries in the query cache. Must be at least 1.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Field indexed by the attribute index. Must not be empty.
    #[serde(default = "default_index_field")]
    pub index_field: String,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_index_field() -> String {
    DEFAULT_INDEX_FIELD.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            index_field: default_index_field(),
        }
    }
}

impl EngineConfig {
    /// Set the cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the indexed field.
    pub fn with_index_field(mut self, field: impl Into<String>) -> Self {
        self.index_field = field.into();
        self
    }

    /// Check every setting.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero capacity or an empty
    /// index field.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(Error::config("cache_capacity must be at least 1"));
        }
        if self.index_field.trim().is_empty() {
            return Err(Error::config("index_field must not be empty"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Shelter collection configuration
#
# Maximum number of distinct normalized queries kept in the result cache.
# The least recently used entry is evicted when the cache is full.
cache_capacity = 128

# Record field maintained in the attribute index.
index_field = "breed"
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the text does not parse, or a
    /// configuration error if a value is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| Error::Serialization(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
