//! # Validation Dispatch
//!
//! The request-time pipeline: decide whether a request is subject to
//! validation, resolve its path to a registered URI or template, merge the
//! captured path variables into the parameters, run the schema and build
//! the client-facing rejection.
//!
//! ## Outcomes
//!
//! | Situation                                  | Result                                   |
//! |--------------------------------------------|------------------------------------------|
//! | gate closed (disabled, method, shape, ...) | `Ok(Skipped(cause))`                     |
//! | no exact or template match                 | `Ok(Skipped(NoSchema))`, fail-open       |
//! | nothing to validate after merging          | `Ok(Skipped(EmptyParams))`               |
//! | schema satisfied                           | `Ok(Valid { route })`                    |
//! | schema violated                            | `Err(ValidationFailed(rejection))`       |
//! | engine gave up                             | `Err(Fault(reason))`                     |
//!
//! The dispatcher holds only immutable state and is shared across request
//! tasks behind an `Arc`. The parameter map belongs to the calling request
//! and is merged in place.

use std::fmt;

use paramguard_core::{is_uri, Params};
use thiserror::Error;

use crate::config::ValidationConfig;
use crate::messages::resolve_message;
use crate::registry::{RegisteredSchema, RegistryError, SchemaRegistry};

/// Separator between per-field messages in a rejection.
pub const MESSAGE_SEPARATOR: &str = "; ";

/// Why a request was not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipCause {
    Disabled,
    MethodNotAllowed,
    MalformedPath,
    Excluded,
    NoSchema,
    EmptyParams,
}

impl SkipCause {
    /// Stable lowercase label, used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::MalformedPath => "malformed_path",
            Self::Excluded => "excluded",
            Self::NoSchema => "no_schema",
            Self::EmptyParams => "empty_params",
        }
    }
}

impl fmt::Display for SkipCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a request that was not rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Validation did not apply.
    Skipped(SkipCause),
    /// The parameters satisfied the schema registered under `route`.
    Valid {
        /// The exact URI or template that resolved.
        route: String,
    },
}

/// One violated constraint, with its client-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The parameter concerned; empty for document-level failures.
    pub field: String,
    pub message: String,
}

/// A schema rejection: the per-field errors and their joined message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Every field message joined with `"; "`.
    pub message: String,
    /// Field errors in engine order.
    pub errors: Vec<FieldError>,
}

impl Rejection {
    fn from_errors(errors: Vec<FieldError>) -> Self {
        let message = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(MESSAGE_SEPARATOR);
        Self { message, errors }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Error returned by [`ValidationDispatcher::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The request parameters violate the schema. The client must correct
    /// the request.
    #[error("{0}")]
    ValidationFailed(Rejection),

    /// The schema engine failed internally.
    #[error("validation fault: {0}")]
    Fault(String),
}

/// Applies the registry to incoming requests.
#[derive(Debug)]
pub struct ValidationDispatcher {
    registry: SchemaRegistry,
}

impl ValidationDispatcher {
    /// Build the registry from `config` and wrap it.
    ///
    /// # Errors
    ///
    /// Propagates the fatal [`RegistryError`] from the registry build.
    pub fn new(config: &ValidationConfig) -> Result<Self, RegistryError> {
        SchemaRegistry::build(config).map(Self::from_registry)
    }

    /// A dispatcher that skips every request.
    pub fn disabled() -> Self {
        Self::from_registry(SchemaRegistry::disabled())
    }

    pub fn from_registry(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validate one request.
    ///
    /// On resolution through a template, the captured path variables are
    /// merged into `params`, overwriting same-named query parameters. A
    /// skipped request leaves `params` untouched.
    ///
    /// # Errors
    ///
    /// [`DispatchError::ValidationFailed`] when the schema is violated and
    /// [`DispatchError::Fault`] when the engine cannot evaluate it.
    pub fn validate(
        &self,
        method: &str,
        path: &str,
        params: &mut Params,
    ) -> Result<ValidationOutcome, DispatchError> {
        if let Some(cause) = self.gate(method, path) {
            tracing::debug!(method, path, cause = %cause, "validation skipped");
            return Ok(ValidationOutcome::Skipped(cause));
        }

        let Some((route, entry)) = self.resolve(path, params) else {
            tracing::warn!(uri = path, "No JSON schema found for URI");
            return Ok(ValidationOutcome::Skipped(SkipCause::NoSchema));
        };

        if params.is_empty() {
            tracing::debug!(route, "no parameters to validate");
            return Ok(ValidationOutcome::Skipped(SkipCause::EmptyParams));
        }

        let violations = entry
            .schema
            .check(&params.to_document())
            .map_err(|e| DispatchError::Fault(e.to_string()))?;

        if violations.is_empty() {
            return Ok(ValidationOutcome::Valid {
                route: route.to_string(),
            });
        }

        let locale = self.registry.message_locale();
        let document = entry.schema.document();
        let errors: Vec<FieldError> = violations
            .iter()
            .map(|v| FieldError {
                field: v.field_name().unwrap_or_else(|| v.instance_path.clone()),
                message: resolve_message(document, v, locale),
            })
            .collect();
        let rejection = Rejection::from_errors(errors);

        tracing::info!(
            route,
            "URI '{}' parameter validation failed: {}",
            path,
            rejection.message
        );
        Err(DispatchError::ValidationFailed(rejection))
    }

    fn gate(&self, method: &str, path: &str) -> Option<SkipCause> {
        if !self.registry.is_enabled() {
            return Some(SkipCause::Disabled);
        }
        if !self.registry.is_method_allowed(method) {
            return Some(SkipCause::MethodNotAllowed);
        }
        if !is_uri(path) {
            return Some(SkipCause::MalformedPath);
        }
        if self.registry.is_excluded(path) {
            return Some(SkipCause::Excluded);
        }
        None
    }

    /// Exact lookup first, then the first template that matches.
    fn resolve<'a>(
        &'a self,
        path: &'a str,
        params: &mut Params,
    ) -> Option<(&'a str, &'a RegisteredSchema)> {
        if let Some(entry) = self.registry.get(path) {
            return Some((path, entry));
        }
        for key in self.registry.variable_templates() {
            let Some(entry) = self.registry.get(key) else {
                continue;
            };
            let result = entry.template.match_uri(path);
            if result.matched {
                params.merge_path_variables(result.variables);
                return Some((key, entry));
            }
        }
        None
    }
}
