//! # board CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use board_cli::document::{run_diff, run_normalize, run_validate, DiffArgs, NormalizeArgs, ValidateArgs};
use board_cli::store::{run_export, run_import, run_list, ExportArgs, ImportArgs, ListArgs};

/// Dashboard document toolchain.
///
/// Validates, normalizes and compares dashboard documents, and moves them
/// in and out of a directory-backed store.
#[derive(Parser, Debug)]
#[command(name = "board", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a dashboard document and report the first fault.
    Validate(ValidateArgs),

    /// Re-encode a dashboard document in canonical form.
    Normalize(NormalizeArgs),

    /// List the top-level fields that differ between two dashboards.
    Diff(DiffArgs),

    /// Save a dashboard document into the store.
    Import(ImportArgs),

    /// Print a stored dashboard.
    Export(ExportArgs),

    /// List stored dashboard keys.
    List(ListArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "board CLI starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &mut out),
        Commands::Normalize(args) => run_normalize(&args, &mut out),
        Commands::Diff(args) => run_diff(&args, &mut out),
        Commands::Import(args) => run_import(&args, &mut out),
        Commands::Export(args) => run_export(&args, &mut out),
        Commands::List(args) => run_list(&args, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
