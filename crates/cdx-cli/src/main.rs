//! # cdx CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; verbosity flags map onto tracing filter
//! levels.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cdx_cli::keygen::{run_keygen, KeygenArgs};
use cdx_cli::status::{run_status, StatusArgs};
use cdx_cli::verify::{run_verify, VerifyArgs};

/// Chaindox Stack CLI
///
/// Administrative tooling for the credential pipeline: status list
/// generation and revocation, issuer key management, and offline
/// credential verification.
#[derive(Parser, Debug)]
#[command(name = "cdx", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Status list operations (generate, revoke, reinstate).
    Status(StatusArgs),

    /// Generate an issuer signing key and its did:web DID document.
    Keygen(KeygenArgs),

    /// Verify a credential's proof offline (no chain access).
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Status(args) => run_status(&args),
        Commands::Keygen(args) => run_keygen(&args),
        Commands::Verify(args) => run_verify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
