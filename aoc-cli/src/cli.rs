//! CLI argument parsing using clap

use aoc_puzzle::{DaySpec, IdentityError, Part, Resolution, resolve};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Advent of Code puzzle client
#[derive(Parser, Debug)]
#[command(
    name = "aoc",
    about = "Fetch, view and submit Advent of Code puzzles",
    version,
    propagate_version = true
)]
pub struct Args {
    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Cache directory for puzzle records
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Configuration file (default: <config dir>/aoc/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Puzzle selection shared by all commands
///
/// Values left out are inferred from a `<year>/d<day>` working directory.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct YearDay {
    /// Puzzle year
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(2015..))]
    pub year: Option<u16>,

    /// Puzzle day, or `latest` for the most recently released one
    #[arg(short, long, allow_negative_numbers = true)]
    pub day: Option<DaySpec>,
}

impl YearDay {
    /// Resolve against the working directory
    pub fn resolve(self, cwd: &Path) -> Result<Resolution, IdentityError> {
        resolve(self.year, self.day, cwd)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a puzzle and write `puzzle.md` and `input`
    Get {
        #[command(flatten)]
        id: YearDay,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write into `<year>/d<day>` below the output directory
        #[arg(short, long)]
        build: bool,
    },

    /// Submit an answer
    Submit {
        #[command(flatten)]
        id: YearDay,

        /// Part to submit (default: first unsolved part)
        #[arg(short, long, value_parser = parse_part)]
        part: Option<Part>,

        /// The answer
        #[arg(allow_negative_numbers = true)]
        answer: String,
    },

    /// Print a cached puzzle
    View {
        #[command(flatten)]
        id: YearDay,

        /// Include accepted answers
        #[arg(short, long)]
        answers: bool,

        /// Re-scrape the puzzle page before printing
        #[arg(long)]
        refresh: bool,
    },
}

fn parse_part(s: &str) -> Result<Part, String> {
    let n: u8 = s.trim().parse().map_err(|_| format!("`{s}` is not a part number"))?;
    Part::try_from(n).map_err(|e| e.to_string())
}
