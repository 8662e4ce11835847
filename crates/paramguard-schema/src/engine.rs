//! # Schema Engine Adapter
//!
//! Wraps the `jsonschema` crate (draft-07) behind a small surface: compile
//! a schema document once, then check parameter documents against it and
//! get back plain [`Violation`] values.
//!
//! The schema document as written is kept next to the compiled validator
//! because error-message customisation reads `/errorMessages` from it.

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

/// Error raised by the schema engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The schema document could not be compiled.
    #[error("schema compilation failed: {0}")]
    Compile(String),

    /// The engine itself failed while evaluating an instance.
    #[error("schema evaluation fault: {0}")]
    Evaluation(String),
}

/// A single validation failure reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the failing value in the instance.
    pub instance_path: String,
    /// JSON Pointer to the failing keyword in the schema.
    pub schema_path: String,
    /// The failing keyword (`pattern`, `required`, `type`, ...).
    pub keyword: String,
    /// For `required` failures, the missing property.
    pub property: Option<String>,
    /// The engine's own wording.
    pub message: String,
}

impl Violation {
    /// Message used when no custom text applies. Always names the location.
    pub fn default_message(&self) -> String {
        self.to_string()
    }

    /// The parameter this violation is about.
    ///
    /// A missing property has no instance location of its own, so
    /// `required` failures name the property; every other failure names
    /// the first segment of its instance location.
    pub fn field_name(&self) -> Option<String> {
        if self.keyword == "required" {
            return self.property.clone();
        }
        self.instance_path
            .split('/')
            .nth(1)
            .filter(|s| !s.is_empty())
            .map(|s| s.replace("~1", "/").replace("~0", "~"))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// A compiled draft-07 schema together with its source document.
pub struct CompiledSchema {
    document: Value,
    validator: Validator,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("document", &self.document)
            .field("validator", &"[compiled]")
            .finish()
    }
}

impl CompiledSchema {
    /// Compile a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Compile`] if the document is not a usable
    /// draft-07 schema.
    pub fn compile(document: Value) -> Result<Self, EngineError> {
        let validator =
            jsonschema::draft7::new(&document).map_err(|e| EngineError::Compile(e.to_string()))?;
        Ok(Self {
            document,
            validator,
        })
    }

    /// The schema document as configured.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Check an instance, returning every violation in engine order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Evaluation`] when the engine gives up on a
    /// value (regex backtracking limit). That is a server-side fault, not a
    /// problem with the request.
    pub fn check(&self, instance: &Value) -> Result<Vec<Violation>, EngineError> {
        let mut violations = Vec::new();
        for error in self.validator.iter_errors(instance) {
            let property = match &error.kind {
                ValidationErrorKind::BacktrackLimitExceeded { .. } => {
                    return Err(EngineError::Evaluation(error.to_string()));
                }
                ValidationErrorKind::Required { property, .. } => {
                    property.as_str().map(str::to_string)
                }
                _ => None,
            };
            let schema_path = error.schema_path.to_string();
            let keyword = schema_path.rsplit('/').next().unwrap_or_default().to_string();
            violations.push(Violation {
                instance_path: error.instance_path.to_string(),
                schema_path,
                keyword,
                property,
                message: error.to_string(),
            });
        }
        Ok(violations)
    }
}
