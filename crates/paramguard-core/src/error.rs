//! # Error Types
//!
//! Errors raised by the core primitives. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Why a string was rejected as a URI template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template was empty or whitespace only.
    #[error("URI template is blank")]
    Blank,

    /// A segment is neither a `{name}` variable nor a legal literal.
    #[error("invalid segment '{segment}' in URI template '{template}'")]
    InvalidSegment {
        /// The full template.
        template: String,
        /// The offending segment.
        segment: String,
    },

    /// The template, with its variables substituted, is not a URI path.
    #[error("URI template '{0}' is not a well-formed path")]
    InvalidStructure(String),
}

/// An HTTP method name outside the recognised set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid HTTP method '{0}'")]
pub struct UnknownMethod(pub String);
