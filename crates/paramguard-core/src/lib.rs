//! # paramguard-core: Foundational Types for Request Validation
//!
//! This crate is the leaf of the paramguard workspace. It owns the pieces
//! of request validation that need no schema engine and no web framework:
//!
//! 1. **URI templates.** [`UriTemplate`] is a validated, immutable path
//!    pattern such as `/api/user/{userId}/order/{orderId}`. Matching a
//!    concrete request path against it yields a [`MatchResult`] carrying the
//!    captured path variables.
//!
//! 2. **HTTP method names.** [`HttpMethod`] is the closed set of method
//!    names a configuration may list. Parsing is case-insensitive.
//!
//! 3. **Request parameters.** [`Params`] is an ordered map from parameter
//!    name to a narrow [`ParamValue`] union, convertible into the JSON
//!    document that a schema validates.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `paramguard-*` crates.
//! - No I/O, no shared mutable state. Every function is safe to call from
//!   any number of request tasks at once.
//! - No `panic!()` or `.unwrap()` outside tests; the only `expect` calls
//!   build constant regexes.

pub mod error;
pub mod method;
pub mod params;
pub mod uri;

pub use error::{TemplateError, UnknownMethod};
pub use method::HttpMethod;
pub use params::{ParamValue, Params};
pub use uri::{
    has_path_variable, is_path_variable, is_uri, is_uri_structure_valid, is_valid_uri_template,
    is_valid_variable_name, match_uri_to_template, MatchResult, Segment, UriTemplate,
};
