//! # paramguard-cli: Operator Command-Line Interface
//!
//! ## Subcommands
//!
//! - `check`: load a configuration, build the registry, list registered
//!   routes and every skipped entry with its reason.
//! - `validate`: dry-run one request through the dispatcher.
//!
//! Handlers write to a caller-supplied writer so they can be tested
//! without capturing stdout. A fatal configuration error is returned as an
//! `anyhow::Error`; a rejected dry run is reported as `Ok(false)`.

pub mod check;
pub mod validate;
