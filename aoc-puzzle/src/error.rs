//! Error types for the puzzle workflow

use crate::identity::PuzzleIdentity;
use crate::record::Part;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which component of a puzzle identity could not be determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Year,
    Day,
    YearAndDay,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Year => f.write_str("year"),
            Missing::Day => f.write_str("day"),
            Missing::YearAndDay => f.write_str("year and day"),
        }
    }
}

/// Error type for resolving which puzzle is meant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Neither supplied explicitly nor inferable from the working directory
    #[error(
        "Could not determine the puzzle {missing}: pass it explicitly or run from a `<year>/d<day>` directory"
    )]
    Unresolved { missing: Missing },
    /// Year precedes the first event
    #[error("Invalid year {0}: puzzles exist from 2015 on")]
    YearOutOfRange(u16),
    /// Day outside 1..=25
    #[error("Invalid day {0}: must be between 1 and 25")]
    DayOutOfRange(u8),
    /// Day argument that is neither a number nor `latest`
    #[error("Invalid day {0:?}: expected a number or `latest`")]
    InvalidDay(String),
    /// Part number other than 1 or 2
    #[error("Invalid part {0}: must be 1 or 2")]
    InvalidPart(u8),
    /// No day of the event has been released yet
    #[error("No puzzle of {0} has been released yet")]
    NotYetReleased(u16),
}

/// A puzzle record breaking one of its consistency rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("part 2 is solved but part 1 is not")]
    PartTwoWithoutPartOne,
    #[error("answer for part {0} is recorded but the part is not solved")]
    AnswerWithoutSolved(Part),
    #[error("question for part 2 is present but part 1 is not solved")]
    QuestionTwoBeforePartOne,
}

/// Cache-specific errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// The storage medium could not be read or written
    #[error("Cache unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored entry could not be decoded or breaks the record invariants
    #[error("Corrupt cache entry {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Refused to store a record that breaks the record invariants
    #[error("Refusing to store inconsistent record for {identity}: {violation}")]
    Invalid {
        identity: PuzzleIdentity,
        violation: InvariantViolation,
    },

    /// Read-modify-write against an identity that has no stored record
    #[error("Puzzle {0} is not cached")]
    NotCached(PuzzleIdentity),
}

impl CacheError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| CacheError::Unavailable { path, source }
    }
}

/// Failure talking to the remote service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    timed_out: bool,
}

impl TransportError {
    /// Create a transport error from any message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    /// Create a transport error for a request that exceeded its timeout
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

/// Error type for the get/submit/view workflow
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// Identity could not be resolved
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Both parts are solved and no part was requested explicitly
    #[error("Puzzle {0} is already complete, nothing left to submit")]
    AlreadyComplete(PuzzleIdentity),

    /// The submitted part is not open yet on the service
    #[error("Part {part} of {identity} is locked, solve part 1 first")]
    PartLocked { identity: PuzzleIdentity, part: Part },

    /// Submission with a blank answer
    #[error("Refusing to submit an empty answer")]
    EmptyAnswer,

    /// Cache failure (fatal for the invocation)
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Remote failure, never retried here
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
