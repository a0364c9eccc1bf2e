//! iacnorm CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or config
//! - 3: Provider resolution failure
//! - 4: Load failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use iacnorm_core::{registry, InitError, LoadError};

mod commands;
mod config;

use commands::{Cli, Commands};
use config::ConfigError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const PROVIDER_ERROR: u8 = 3;
    pub const LOAD_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = registry::install(iacnorm_providers::default_registry()) {
        eprintln!("Error: {}", e);
        return ExitCode::from(ExitCodes::GENERAL_ERROR);
    }

    let result = match cli.command {
        Commands::Scan(args) => commands::scan::execute(args).await,
        Commands::Providers => commands::providers::execute(),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Logs go to stderr so JSON on stdout stays parseable.
fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else if verbose {
        "iacnorm_cli=debug,iacnorm_core=debug,iacnorm_providers=debug,warn"
    } else {
        "iacnorm_cli=info,iacnorm_core=info,iacnorm_providers=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Map an error to an exit code by its type, walking the context chain.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(init) = cause.downcast_ref::<InitError>() {
            return match init {
                InitError::Validation(_) => ExitCodes::INVALID_ARGS,
                InitError::ProviderResolution { .. } => ExitCodes::PROVIDER_ERROR,
                InitError::RegistryUnavailable(_) => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<LoadError>().is_some() {
            return ExitCodes::LOAD_ERROR;
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return ExitCodes::INVALID_ARGS;
        }
    }
    ExitCodes::GENERAL_ERROR
}
