//! Clap derive structures for the `rastro` CLI.

use clap::{Parser, ValueEnum};

/// rastro -- batch package-tracking lookups from the command line
#[derive(Debug, Parser)]
#[command(
    name = "rastro",
    version,
    about = "Look up package-tracking codes in batch",
    long_about = "Looks up one or more tracking codes against the upstream\n\
        provider, under a configurable concurrency cap, and prints one\n\
        normalized result per unique code.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Tracking codes to look up (duplicates collapse to one lookup)
    #[arg(value_name = "CODE", required = true)]
    pub codes: Vec<String>,

    /// Use the simulated provider instead of the real upstream
    #[arg(long, env = "RASTRO_SIMULATION")]
    pub simulate: bool,

    /// Concurrent in-flight lookups (overrides config)
    #[arg(long, short = 'n', value_name = "N")]
    pub concurrency: Option<usize>,

    /// Upstream credential, e.g. "Apikey <token>" (overrides config)
    #[arg(long, env = "RASTRO_UPSTREAM_AUTH", hide_env = true, value_name = "CREDENTIAL")]
    pub auth: Option<String>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
}
