//! # paramguard CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;

/// paramguard: request parameter validation against JSON Schema.
///
/// Checks validation configurations and dry-runs requests through the
/// dispatcher.
#[derive(Parser, Debug)]
#[command(name = "paramguard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Build the registry and list routes and skipped entries.
    Check(paramguard_cli::check::CheckArgs),
    /// Dry-run one request through the dispatcher.
    Validate(paramguard_cli::validate::ValidateArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Check(args) => {
            paramguard_cli::check::run_check(&args, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate(args) => {
            if paramguard_cli::validate::run_validate(&args, &mut stdout)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
