//! Error types and exit codes for the CLI

use aoc_http_client::AocError;
use aoc_puzzle::{CacheError, IdentityError, PuzzleError};
use std::process::ExitCode;
use thiserror::Error;

/// Environment variable holding the adventofcode.com session cookie
pub const SESSION_ENV: &str = "AOC_SESSION";

/// Process exit status, one per distinct outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    Success = 0,
    Failure = 1,
    Rejected = 2,
    Throttled = 3,
    TransportFailed = 4,
    IdentityUnresolved = 5,
    AlreadyComplete = 6,
    CacheUnavailable = 7,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No credential in the environment
    #[error("AOC_SESSION is not set; export your adventofcode.com session cookie")]
    MissingSession,

    /// Workflow error from the puzzle core
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(#[from] AocError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IdentityError> for CliError {
    fn from(e: IdentityError) -> Self {
        CliError::Puzzle(e.into())
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Puzzle(e.into())
    }
}

impl CliError {
    /// Exit status reported for this error
    pub fn exit(&self) -> Exit {
        match self {
            CliError::Puzzle(PuzzleError::Identity(_)) => Exit::IdentityUnresolved,
            CliError::Puzzle(PuzzleError::AlreadyComplete(_)) => Exit::AlreadyComplete,
            CliError::Puzzle(PuzzleError::Cache(_)) => Exit::CacheUnavailable,
            CliError::Puzzle(PuzzleError::Transport(_)) => Exit::TransportFailed,
            CliError::Puzzle(PuzzleError::PartLocked { .. }) => Exit::Rejected,
            CliError::Puzzle(PuzzleError::EmptyAnswer) => Exit::Failure,
            CliError::Http(AocError::MissingSession | AocError::ClientInit(_)) => Exit::Failure,
            CliError::Http(_) => Exit::TransportFailed,
            CliError::Config(_) | CliError::MissingSession | CliError::Io(_) => Exit::Failure,
        }
    }
}
