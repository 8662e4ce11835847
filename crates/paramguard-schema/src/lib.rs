//! # paramguard-schema: Schema Registry and Validation Dispatch
//!
//! Turns a [`ValidationConfig`] into a read-only [`SchemaRegistry`] of
//! compiled JSON Schemas, and applies it to requests through the
//! [`ValidationDispatcher`].
//!
//! ## Layout
//!
//! - [`config`]: the configuration value and its YAML/JSON loader.
//! - [`engine`]: the `jsonschema` adapter (compile, check, violations).
//! - [`registry`]: startup build with per-entry skip reasons.
//! - [`messages`]: custom error text from a schema's `errorMessages`.
//! - [`dispatch`]: the request-time gate, resolution and rejection.
//!
//! ## Usage
//!
//! ```
//! use paramguard_core::Params;
//! use paramguard_schema::{SchemaEntry, ValidationConfig, ValidationDispatcher, ValidationOutcome};
//!
//! let config = ValidationConfig {
//!     enabled: true,
//!     include_methods: vec!["GET".into()],
//!     schemas: vec![SchemaEntry::new(
//!         "/user/{userId}",
//!         r#"{"properties": {"userId": {"pattern": "^[1-9][0-9]*$"}}}"#,
//!     )],
//!     ..Default::default()
//! };
//! let dispatcher = ValidationDispatcher::new(&config).unwrap();
//!
//! let mut params = Params::new();
//! let outcome = dispatcher.validate("GET", "/user/12", &mut params).unwrap();
//! assert_eq!(outcome, ValidationOutcome::Valid { route: "/user/{userId}".into() });
//! assert!(dispatcher.validate("GET", "/user/abc", &mut Params::new()).is_err());
//! ```

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod messages;
pub mod registry;

pub use config::{ConfigError, MessageLocale, SchemaEntry, ValidationConfig};
pub use dispatch::{
    DispatchError, FieldError, Rejection, SkipCause, ValidationDispatcher, ValidationOutcome,
};
pub use engine::{CompiledSchema, EngineError, Violation};
pub use messages::{format_custom, resolve_message};
pub use registry::{RegisteredSchema, RegistryError, SchemaRegistry, SkipReason, SkippedEntry};
