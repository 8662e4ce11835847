//! # Validation Configuration
//!
//! The immutable configuration value the registry is built from. It is
//! read once at process start and passed by reference; nothing mutates it
//! afterwards.
//!
//! ## File Format
//!
//! YAML (`.yaml`/`.yml`) or JSON (any other extension), with everything
//! under a single `json-schema` root key:
//!
//! ```yaml
//! json-schema:
//!   enabled: true
//!   exclude-uris: [/health/liveness]
//!   include-methods: [GET]
//!   message-locale: en
//!   schemas:
//!     - uri: /user/{userId}/call/{callId}
//!       description: call lookup
//!       schema: |
//!         {"type": "object", "required": ["userId"]}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file '{path}': {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML/JSON or does not fit the config shape.
    #[error("invalid config file '{path}': {reason}")]
    Parse {
        /// Path that was parsed.
        path: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Language used when formatting custom error messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLocale {
    #[default]
    En,
    Zh,
}

/// Request validation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ValidationConfig {
    /// Master switch. Nothing is validated or even compiled when false.
    pub enabled: bool,
    /// URIs and templates that are never validated.
    pub exclude_uris: Vec<String>,
    /// HTTP methods that are validated, case-insensitive.
    pub include_methods: Vec<String>,
    /// Language for custom error messages.
    pub message_locale: MessageLocale,
    /// Declared schema entries, in priority order for duplicates.
    pub schemas: Vec<SchemaEntry>,
}

/// One configured rule: a URI or template and the schema its parameters
/// must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SchemaEntry {
    pub uri: String,
    /// JSON Schema (draft-07) as JSON text.
    pub schema: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SchemaEntry {
    /// An enabled entry with no description.
    pub fn new(uri: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            schema: schema.into(),
            description: String::new(),
            enabled: true,
        }
    }
}

/// On-disk layout: the settings live under `json-schema`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(rename = "json-schema", default)]
    json_schema: ValidationConfig,
}

impl ValidationConfig {
    /// Whether `uri` is listed verbatim in `exclude-uris`.
    pub fn is_excluded(&self, uri: &str) -> bool {
        self.exclude_uris.iter().any(|u| u == uri)
    }

    /// Parse a YAML document with a `json-schema` root key.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(file.json_schema)
    }

    /// Parse a JSON document with a `json-schema` root key.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let file: ConfigFile = serde_json::from_str(content)?;
        Ok(file.json_schema)
    }

    /// Load a configuration file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its content does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parsed = match ext {
            "yaml" | "yml" => Self::from_yaml_str(&content).map_err(|e| e.to_string()),
            _ => Self::from_json_str(&content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|reason| ConfigError::Parse {
            path: path.display().to_string(),
            reason,
        })
    }
}
