//! Boundary to the remote puzzle service

use crate::error::TransportError;
use crate::identity::PuzzleIdentity;
use crate::record::{Part, PuzzleRecord};
use crate::schedule;
use chrono::Utc;
use std::fmt;
use std::time::Duration;

/// A single answer proposal, built by the coordinator and never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAttempt {
    pub identity: PuzzleIdentity,
    pub part: Part,
    pub answer: String,
}

/// Direction hint the service gives for some wrong answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerHint {
    TooHigh,
    TooLow,
}

impl fmt::Display for AnswerHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerHint::TooHigh => f.write_str("too high"),
            AnswerHint::TooLow => f.write_str("too low"),
        }
    }
}

/// The service's verdict on a submission
///
/// Transport failures are the `Err` side of [`RemoteGateway::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect { hint: Option<AnswerHint> },
    AlreadySolved,
    RateLimited { wait: Option<Duration> },
}

/// Scrape and submit operations against the remote service
///
/// Implementations own the credential and the network timeout. Calls are
/// blocking.
pub trait RemoteGateway {
    /// Fetch the puzzle page and input for `identity`
    fn scrape(&self, identity: PuzzleIdentity) -> Result<PuzzleRecord, TransportError>;

    /// Propose an answer for one part
    fn submit(&self, attempt: &SubmissionAttempt) -> Result<Verdict, TransportError>;

    /// Year of the running (or last finished) event
    fn current_year(&self) -> u16 {
        schedule::current_event_year(Utc::now())
    }

    /// Most recently released day of `year`, `None` if nothing is out yet
    fn latest_unlocked_day(&self, year: u16) -> Option<u8> {
        schedule::latest_unlocked_day(year, Utc::now())
    }
}

impl<G: RemoteGateway + ?Sized> RemoteGateway for &G {
    fn scrape(&self, identity: PuzzleIdentity) -> Result<PuzzleRecord, TransportError> {
        (**self).scrape(identity)
    }

    fn submit(&self, attempt: &SubmissionAttempt) -> Result<Verdict, TransportError> {
        (**self).submit(attempt)
    }

    fn current_year(&self) -> u16 {
        (**self).current_year()
    }

    fn latest_unlocked_day(&self, year: u16) -> Option<u8> {
        (**self).latest_unlocked_day(year)
    }
}
