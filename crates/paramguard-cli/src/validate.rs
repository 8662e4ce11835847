//! # Validate Subcommand
//!
//! Dry-runs one request through the dispatcher, as the service would see
//! it, without starting a server.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use paramguard_core::Params;
use paramguard_schema::{DispatchError, ValidationConfig, ValidationDispatcher, ValidationOutcome};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Validation configuration file (YAML or JSON).
    pub config: PathBuf,

    /// HTTP method of the request.
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Request path, e.g. `/api/users/12`.
    #[arg(long)]
    pub path: String,

    /// Raw query string without the leading `?`.
    #[arg(long, default_value = "")]
    pub query: String,
}

/// Run the request. Returns `Ok(false)` when the request is rejected.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> anyhow::Result<bool> {
    let config = ValidationConfig::load(&args.config)?;
    let dispatcher = ValidationDispatcher::new(&config)?;
    let mut params = Params::from_query(args.query.trim_start_matches('?'));

    match dispatcher.validate(&args.method, &args.path, &mut params) {
        Ok(ValidationOutcome::Valid { route }) => {
            writeln!(out, "valid (route: {route})")?;
            writeln!(out, "params: {}", params.to_document())?;
            Ok(true)
        }
        Ok(ValidationOutcome::Skipped(cause)) => {
            writeln!(out, "skipped: {cause}")?;
            Ok(true)
        }
        Err(DispatchError::ValidationFailed(rejection)) => {
            writeln!(out, "rejected: {}", rejection.message)?;
            for error in &rejection.errors {
                let field = if error.field.is_empty() {
                    "(root)"
                } else {
                    error.field.as_str()
                };
                writeln!(out, "  {field}: {}", error.message)?;
            }
            Ok(false)
        }
        Err(fault @ DispatchError::Fault(_)) => Err(fault.into()),
    }
}
