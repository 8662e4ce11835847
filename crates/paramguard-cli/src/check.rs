//! # Check Subcommand
//!
//! Builds the registry from a configuration file and prints what it
//! contains.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use paramguard_core::has_path_variable;
use paramguard_schema::{SchemaRegistry, ValidationConfig};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Validation configuration file (YAML or JSON).
    pub config: PathBuf,
}

/// Load the configuration, build the registry and print a report.
pub fn run_check(args: &CheckArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let config = ValidationConfig::load(&args.config)?;
    let registry = SchemaRegistry::build(&config)
        .with_context(|| format!("cannot build registry from '{}'", args.config.display()))?;
    report(&registry, out)?;
    Ok(())
}

/// Write the human-readable registry report.
pub fn report(registry: &SchemaRegistry, out: &mut dyn Write) -> std::io::Result<()> {
    if !registry.is_enabled() {
        writeln!(out, "validation: disabled")?;
        return Ok(());
    }

    let methods: Vec<&str> = registry
        .allowed_methods()
        .iter()
        .map(|m| m.as_str())
        .collect();
    if methods.is_empty() {
        writeln!(out, "validation: enabled (no methods configured)")?;
    } else {
        writeln!(out, "validation: enabled (methods: {})", methods.join(", "))?;
    }

    let routes = registry.routes();
    writeln!(out, "registered routes ({}):", routes.len())?;
    for route in routes {
        let kind = if has_path_variable(route) {
            " [template]"
        } else {
            ""
        };
        match registry.get(route).map(|e| e.description.as_str()) {
            Some(description) if !description.is_empty() => {
                writeln!(out, "  {route}{kind}  {description}")?
            }
            _ => writeln!(out, "  {route}{kind}")?,
        }
    }

    let skipped = registry.skipped();
    writeln!(out, "skipped entries ({}):", skipped.len())?;
    for entry in skipped {
        writeln!(out, "  {}: {}", entry.uri, entry.reason)?;
    }
    Ok(())
}
