//! Stable matching CLI.
//!
//! ```text
//! stable-marriage solve --group-a pref1.csv --group-b pref2.csv
//! stable-marriage check --group-a pref1.csv --group-b pref2.csv --matching out.csv
//! stable-marriage generate --size 100 --seed 5 --out-dir data/
//! ```

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};

use stable_marriage::analysis::{blocking_pairs, score_matching, validate_matching};
use stable_marriage::engine::Deadline;
use stable_marriage::table::{
    read_matching, read_preferences, seeded_preferences, write_matching_json, write_matching_to,
    write_preferences,
};
use stable_marriage::{MatchResult, MatcherConfig, MatchingEngine, PreferenceTable};

mod cli;
mod logging;

use crate::cli::{
    CheckArgs, Cli, Command, GenerateArgs, LogFormatArg, LogLevelArg, OutputFormatArg, SolveArgs,
    TableArgs,
};
use crate::logging::{init_logging, LogConfig, LogFormat};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        process::exit(1);
    }

    let outcome = match &cli.command {
        Command::Solve(args) => run_solve(args).map(|()| true),
        Command::Check(args) => run_check(args),
        Command::Generate(args) => run_generate(args).map(|()| true),
    };

    let exit_code = match outcome {
        Ok(true) => 0,
        Ok(false) => 2,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    process::exit(exit_code);
}

/// Explicit CLI flags beat `RUST_LOG`; `RUST_LOG` beats the default.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::from_verbosity(cli.verbose, cli.quiet);
    config.use_env_filter = cli.verbose == 0 && !cli.quiet && cli.log_level.is_none();
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.with_ansi = io::stderr().is_terminal();
    config
}

// ============================================================================
// Commands
// ============================================================================

fn run_solve(args: &SolveArgs) -> Result<()> {
    let (group_a, group_b) = load_tables(&args.tables)?;

    let config = MatcherConfig::default()
        .with_checkpoint_interval(args.checkpoint_interval)
        .with_reverse_roles(args.reverse_roles);
    let engine = MatchingEngine::with_config(config);

    let started = Instant::now();
    let result: MatchResult = match args.time_limit_ms {
        Some(ms) => engine
            .with_cancellation(Deadline::after(Duration::from_millis(ms)))
            .find_stable_matching(&group_a, &group_b),
        None => engine.find_stable_matching(&group_a, &group_b),
    }
    .context("failed to compute stable matching")?;

    info!(
        proposals = result.stats.proposals,
        rejections = result.stats.rejections,
        matched = result.matching.matched_count(),
        unmatched = result.matching.len() - result.matching.matched_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        digest = %result.matching.digest_hex(),
        "solved"
    );

    match &args.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_output(file, &result, args.format, path)
        }
        None => write_output(io::stdout().lock(), &result, args.format, Path::new("<stdout>")),
    }
}

fn write_output<W: Write>(
    mut writer: W,
    result: &MatchResult,
    format: OutputFormatArg,
    origin: &Path,
) -> Result<()> {
    match format {
        OutputFormatArg::Csv => write_matching_to(&mut writer, &result.matching, origin)?,
        OutputFormatArg::Json => {
            write_matching_json(&mut writer, &result.matching)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Returns `Ok(false)` when the matching is valid but unstable.
fn run_check(args: &CheckArgs) -> Result<bool> {
    let (group_a, group_b) = load_tables(&args.tables)?;
    let matching = read_matching(&args.matching)
        .with_context(|| format!("failed to read matching {}", args.matching.display()))?;

    validate_matching(&group_a, &group_b, &matching).context("matching does not fit the tables")?;
    let blocking = blocking_pairs(&group_a, &group_b, &matching)?;
    let score = score_matching(&group_a, &group_b, &matching)?;

    let mut out = io::stdout().lock();
    if blocking.is_empty() {
        writeln!(out, "stable: yes")?;
    } else {
        writeln!(out, "stable: no ({} blocking pairs)", blocking.len())?;
        for pair in &blocking {
            writeln!(out, "  {} <-> {}", pair.proposer, pair.receiver)?;
        }
    }
    writeln!(out, "score group A: {}", score.group_a)?;
    writeln!(out, "score group B: {}", score.group_b)?;
    writeln!(out, "score total:   {}", score.total())?;
    writeln!(out, "unmatched:     {}", score.unmatched)?;
    writeln!(out, "digest:        {}", matching.digest_hex())?;

    if !blocking.is_empty() {
        warn!(blocking = blocking.len(), "matching is unstable");
    }
    Ok(blocking.is_empty())
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let size_b = args.size_b.unwrap_or(args.size);
    let (group_a, group_b) = seeded_preferences(args.size, size_b, args.seed)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let stem = format!("seed{}-n{}.csv", args.seed, args.size);
    let path_a = args.out_dir.join(format!("pref1-{stem}"));
    let path_b = args.out_dir.join(format!("pref2-{stem}"));
    write_preferences(&path_a, &group_a)?;
    write_preferences(&path_b, &group_b)?;

    info!(
        group_a = %path_a.display(),
        group_b = %path_b.display(),
        size_a = args.size,
        size_b,
        seed = args.seed,
        "generated preference tables"
    );
    Ok(())
}

fn load_tables(args: &TableArgs) -> Result<(PreferenceTable, PreferenceTable)> {
    let group_a = read_preferences(&args.group_a)
        .with_context(|| format!("failed to read group A from {}", args.group_a.display()))?;
    let group_b = read_preferences(&args.group_b)
        .with_context(|| format!("failed to read group B from {}", args.group_b.display()))?;
    Ok((group_a, group_b))
}
