//! # Middleware Stack
//!
//! Tower middleware for the API layer:
//! - [`tracing_layer`]: request/response tracing with `TraceLayer`.
//! - [`schema_guard`]: JSON Schema validation of query parameters and
//!   path variables, with outcome counters.

pub mod schema_guard;
pub mod tracing_layer;
