//! # Schema Registry
//!
//! Built once at startup from a [`ValidationConfig`]; read-only afterwards
//! and safe to share across request tasks without locking.
//!
//! ## Build Sequence
//!
//! 1. **Feature switch**: a disabled configuration yields an empty
//!    registry; nothing else is checked.
//! 2. **Method list**: every `include-methods` entry must name a known
//!    HTTP method. An unknown name aborts the build.
//! 3. **Entries**: each declared schema is admitted or skipped, in
//!    declaration order. Skips never abort the build; they are collected
//!    and logged together at the end.
//!
//! Skip checks run in this order: disabled, excluded, malformed URI,
//! duplicate URI (the first declaration wins), malformed JSON, schema
//! compilation failure.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use paramguard_core::{has_path_variable, HttpMethod, UriTemplate};
use serde_json::Value;
use thiserror::Error;

use crate::config::{MessageLocale, SchemaEntry, ValidationConfig};
use crate::engine::CompiledSchema;

/// Fatal configuration error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An `include-methods` entry is not an HTTP method.
    #[error("Invalid HTTP method '{method}'. Please check your configuration.")]
    UnknownMethod {
        /// The entry as configured.
        method: String,
    },
}

/// Why a declared schema entry was left out of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    Excluded,
    InvalidUri,
    Duplicate,
    InvalidJson(String),
    CompileFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("validation is disabled"),
            Self::Excluded => f.write_str("URI is excluded"),
            Self::InvalidUri => f.write_str("invalid format"),
            Self::Duplicate => f.write_str("URI is duplicated"),
            Self::InvalidJson(reason) => write!(f, "invalid JSON schema ({reason})"),
            Self::CompileFailed(reason) => write!(f, "schema conversion failed ({reason})"),
        }
    }
}

/// A declared entry that did not make it into the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub uri: String,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skipping validation for URI '{}': {}", self.uri, self.reason)
    }
}

/// An admitted entry.
#[derive(Debug)]
pub struct RegisteredSchema {
    pub template: UriTemplate,
    pub description: String,
    pub schema: CompiledSchema,
}

/// Compiled schemas keyed by exact URI or template string.
#[derive(Debug)]
pub struct SchemaRegistry {
    enabled: bool,
    allowed_methods: BTreeSet<HttpMethod>,
    exclude_uris: Vec<String>,
    message_locale: MessageLocale,
    schemas: HashMap<String, RegisteredSchema>,
    /// Keys containing a path variable. Sorted, so resolution is
    /// deterministic and literal segments win over `{...}` at the first
    /// position where two candidates differ.
    variable_templates: BTreeSet<String>,
    skipped: Vec<SkippedEntry>,
}

impl SchemaRegistry {
    /// Build the registry from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownMethod`] if validation is enabled
    /// and an `include-methods` entry is not a recognised HTTP method.
    pub fn build(config: &ValidationConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::empty(config);

        if !config.enabled {
            tracing::info!("JSON Schema validation is not enabled.");
            return Ok(registry);
        }

        registry.allowed_methods = parse_methods(&config.include_methods)?;

        for entry in &config.schemas {
            if let Err(reason) = registry.admit(entry, config) {
                registry.skipped.push(SkippedEntry {
                    uri: entry.uri.clone(),
                    reason,
                });
            }
        }

        if !registry.skipped.is_empty() {
            let lines: Vec<String> = registry.skipped.iter().map(ToString::to_string).collect();
            tracing::warn!(
                skipped = registry.skipped.len(),
                "schema entries skipped:\n{}",
                lines.join("\n")
            );
        }

        tracing::info!(
            registered = registry.schemas.len(),
            templates = registry.variable_templates.len(),
            "schema registry built"
        );

        Ok(registry)
    }

    /// A registry that validates nothing.
    pub fn disabled() -> Self {
        Self::empty(&ValidationConfig::default())
    }

    fn empty(config: &ValidationConfig) -> Self {
        Self {
            enabled: config.enabled,
            allowed_methods: BTreeSet::new(),
            exclude_uris: config.exclude_uris.clone(),
            message_locale: config.message_locale,
            schemas: HashMap::new(),
            variable_templates: BTreeSet::new(),
            skipped: Vec::new(),
        }
    }

    fn admit(&mut self, entry: &SchemaEntry, config: &ValidationConfig) -> Result<(), SkipReason> {
        if !entry.enabled {
            return Err(SkipReason::Disabled);
        }
        if config.is_excluded(&entry.uri) {
            return Err(SkipReason::Excluded);
        }
        let template = UriTemplate::parse(&entry.uri).map_err(|e| {
            tracing::debug!(uri = %entry.uri, error = %e, "rejected URI template");
            SkipReason::InvalidUri
        })?;
        if self.schemas.contains_key(&entry.uri) {
            return Err(SkipReason::Duplicate);
        }
        let document: Value = serde_json::from_str(&entry.schema)
            .map_err(|e| SkipReason::InvalidJson(e.to_string()))?;
        let schema =
            CompiledSchema::compile(document).map_err(|e| SkipReason::CompileFailed(e.to_string()))?;

        if has_path_variable(&entry.uri) {
            self.variable_templates.insert(entry.uri.clone());
        }
        self.schemas.insert(
            entry.uri.clone(),
            RegisteredSchema {
                template,
                description: entry.description.clone(),
                schema,
            },
        );
        Ok(())
    }

    /// Whether validation is switched on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Parsed `include-methods`.
    pub fn allowed_methods(&self) -> &BTreeSet<HttpMethod> {
        &self.allowed_methods
    }

    /// Whether a request method is in `include-methods`, ignoring case.
    pub fn is_method_allowed(&self, method: &str) -> bool {
        method
            .parse::<HttpMethod>()
            .map(|m| self.allowed_methods.contains(&m))
            .unwrap_or(false)
    }

    /// Whether `uri` is listed verbatim in `exclude-uris`.
    pub fn is_excluded(&self, uri: &str) -> bool {
        self.exclude_uris.iter().any(|u| u == uri)
    }

    /// Language for custom error messages.
    pub fn message_locale(&self) -> MessageLocale {
        self.message_locale
    }

    /// Look up an entry by its exact URI or template string.
    pub fn get(&self, uri: &str) -> Option<&RegisteredSchema> {
        self.schemas.get(uri)
    }

    /// Keys that contain a path variable, in sorted order.
    pub fn variable_templates(&self) -> impl Iterator<Item = &str> {
        self.variable_templates.iter().map(String::as_str)
    }

    /// Every registered key, sorted.
    pub fn routes(&self) -> Vec<&str> {
        let mut routes: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        routes.sort_unstable();
        routes
    }

    /// Declared entries that were skipped, in declaration order.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn parse_methods(names: &[String]) -> Result<BTreeSet<HttpMethod>, RegistryError> {
    if names.is_empty() {
        tracing::info!("No HTTP methods are configured for validation.");
    }
    names
        .iter()
        .map(|name| {
            name.parse::<HttpMethod>().map_err(|_| {
                let err = RegistryError::UnknownMethod {
                    method: name.clone(),
                };
                tracing::error!("{err}");
                err
            })
        })
        .collect()
}
