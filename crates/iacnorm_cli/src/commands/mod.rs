//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod providers;
pub mod scan;

/// iacnorm - normalize Infrastructure-as-Code for policy evaluation
#[derive(Parser)]
#[command(name = "iacnorm")]
#[command(version, about = "iacnorm - normalize Infrastructure-as-Code for policy evaluation")]
#[command(long_about = r#"
iacnorm loads IaC source (a file or a directory tree) with the provider
registered for a (type, version) pair and prints the normalized result as JSON.

COMMANDS:
  scan       → Load files/directories and print the normalized tree
  providers  → List registered (type, version) pairs

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or config
  3 - No provider for the requested type/version
  4 - Provider failed to load the source
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize IaC files or directories
    Scan(scan::ScanArgs),

    /// List registered providers
    Providers,
}
