// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `globdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "globdag",
    version,
    about = "Run the tasks of a manifest whose outputs are older than their inputs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the manifest (TOML).
    ///
    /// Default: `Globdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Globdag.toml")]
    pub config: String,

    /// Run every task regardless of timestamps.
    #[arg(long)]
    pub force: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GLOBDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the execution order, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
