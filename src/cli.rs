//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "stable-marriage",
    version,
    about = "Compute stable matchings between two groups",
    long_about = "Compute stable matchings between two groups with deferred acceptance.\n\n\
                  Preference tables are column-oriented CSV: the header names each\n\
                  participant and the column below holds their ranking, best first."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Explicit log level (overrides -v/-q).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the stable matching for a pair of preference tables.
    Solve(SolveArgs),

    /// Check a matching for stability and score it.
    Check(CheckArgs),

    /// Write a pair of random preference tables.
    Generate(GenerateArgs),
}

/// The two preference tables every command reads.
#[derive(Args)]
pub struct TableArgs {
    /// Group A preferences (the proposers).
    #[arg(long = "group-a", value_name = "CSV")]
    pub group_a: PathBuf,

    /// Group B preferences (the matching is keyed by this group).
    #[arg(long = "group-b", value_name = "CSV")]
    pub group_b: PathBuf,
}

#[derive(Args)]
pub struct SolveArgs {
    #[command(flatten)]
    pub tables: TableArgs,

    /// Let group B propose instead of group A.
    #[arg(long = "reverse-roles")]
    pub reverse_roles: bool,

    /// Output format for the matching.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: OutputFormatArg,

    /// Write the matching here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Abort if the run takes longer than this many milliseconds.
    #[arg(long = "time-limit-ms", value_name = "MS")]
    pub time_limit_ms: Option<u64>,

    /// Poll for cancellation every this many proposals (0 disables polling).
    #[arg(long = "checkpoint-interval", value_name = "N", default_value_t = 1)]
    pub checkpoint_interval: u64,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub tables: TableArgs,

    /// Matching to check (columns group_b, group_a).
    #[arg(long = "matching", value_name = "CSV")]
    pub matching: PathBuf,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Number of group-A participants.
    #[arg(long = "size", short = 'n', value_name = "N")]
    pub size: usize,

    /// Number of group-B participants (default: same as --size).
    #[arg(long = "size-b", value_name = "M")]
    pub size_b: Option<usize>,

    /// Seed for the random generator.
    #[arg(long = "seed", default_value_t = 5)]
    pub seed: u64,

    /// Directory for the generated CSV files.
    #[arg(long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
