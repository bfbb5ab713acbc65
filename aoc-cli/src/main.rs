//! AOC CLI - Command-line interface for fetching, viewing and submitting Advent of Code puzzles

mod cli;
mod config;
mod error;
mod gateway;
mod output;

use aoc_puzzle::{Coordinator, PuzzleCache, PuzzleIdentity, PuzzleRecord, SubmitOutcome};
use clap::Parser;
use cli::{Args, Command};
use config::Config;
use error::{CliError, Exit};
use gateway::HttpGateway;
use output::{OutputFormatter, render_record};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

const PUZZLE_FILE: &str = "puzzle.md";
const INPUT_FILE: &str = "input";

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // clap would exit with 2, which means a rejected answer here
            let _ = e.print();
            return if e.use_stderr() {
                Exit::Failure.into()
            } else {
                Exit::Success.into()
            };
        }
    };

    setup_logging(args.verbose, args.quiet);

    match run(args) {
        Ok(exit) => exit.into(),
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit().into()
        }
    }
}

fn run(args: Args) -> Result<Exit, CliError> {
    // Session is checked here, before any command runs
    let config = Config::load(&args)?;
    let cwd = std::env::current_dir()?;
    debug!(cache_dir = %config.cache_dir.display(), cwd = %cwd.display(), "starting");

    let coordinator = Coordinator::new(
        HttpGateway::new(config.http_client()?),
        PuzzleCache::new(&config.cache_dir),
    )
    .with_refresh_policy(config.refresh);
    let formatter = OutputFormatter::new(config.quiet);

    match args.command {
        Command::Get { id, output, build } => {
            let identity = coordinator.resolve(id.resolve(&cwd)?)?;
            let record = coordinator.get(identity)?;

            let dest = output_dir(output.unwrap_or(cwd), identity, build);
            write_puzzle_files(&dest, &record)?;
            formatter.print_written(identity, &dest);
            Ok(Exit::Success)
        }
        Command::Submit { id, part, answer } => {
            let identity = coordinator.resolve(id.resolve(&cwd)?)?;
            let outcome = coordinator.submit(identity, part, &answer)?;

            if let SubmitOutcome::Accepted { record, .. } = &outcome {
                refresh_local_puzzle(&cwd, identity, record)?;
            }
            Ok(formatter.print_outcome(identity, &outcome))
        }
        Command::View {
            id,
            answers,
            refresh,
        } => {
            let identity = coordinator.resolve(id.resolve(&cwd)?)?;
            let record = coordinator.view(identity, refresh)?;
            formatter.print_record(&record, answers);
            Ok(Exit::Success)
        }
    }
}

/// `base`, or `base/<year>/d<day>` when building the directory layout
fn output_dir(base: PathBuf, identity: PuzzleIdentity, build: bool) -> PathBuf {
    if build {
        base.join(identity.year().to_string())
            .join(format!("d{:02}", identity.day()))
    } else {
        base
    }
}

fn write_puzzle_files(dest: &Path, record: &PuzzleRecord) -> Result<(), CliError> {
    fs::create_dir_all(dest)?;
    fs::write(dest.join(PUZZLE_FILE), render_record(record, true))?;
    fs::write(dest.join(INPUT_FILE), &record.input)?;
    Ok(())
}

/// Rewrite `puzzle.md` in the working directory if `get` put one there
fn refresh_local_puzzle(
    cwd: &Path,
    identity: PuzzleIdentity,
    record: &PuzzleRecord,
) -> Result<(), CliError> {
    let path = cwd.join(PUZZLE_FILE);
    if path.is_file() {
        fs::write(&path, render_record(record, true))?;
        info!(%identity, path = %path.display(), "updated puzzle file");
    }
    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        LevelFilter::DEBUG
    } else if quiet {
        LevelFilter::ERROR
    } else {
        LevelFilter::WARN
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}
