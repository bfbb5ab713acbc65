//! Advent of Code Puzzle Workflow Library
//!
//! Resolves which puzzle the user is working on, keeps a local cache of
//! puzzle statements and inputs, and drives answer submission while keeping
//! the cache in step with the service's verdicts.
//!
//! # Overview
//!
//! This library provides:
//! - Identity resolution from explicit arguments or a `<year>/d<day>` directory layout
//! - A file-backed, process-safe cache of [`PuzzleRecord`]s
//! - The part selection heuristic for submissions without an explicit part
//! - A [`Coordinator`] running the submit state machine against any [`RemoteGateway`]
//!
//! # Quick Example
//!
//! ```
//! use aoc_puzzle::{resolve, PuzzleIdentity, Resolution};
//! use std::path::Path;
//!
//! let resolution = resolve(None, None, Path::new("/home/me/aoc/2024/d06")).unwrap();
//! assert_eq!(resolution, Resolution::Exact(PuzzleIdentity::new(2024, 6).unwrap()));
//! ```
//!
//! # Key Concepts
//!
//! ## Cache
//!
//! [`PuzzleCache`] stores one JSON record per puzzle. Lookups never touch the
//! network; [`PuzzleCache::get_or_fetch`] fetches at most once per cold puzzle,
//! and [`PuzzleCache::update`] is an atomic read-modify-write that never drops
//! a solved part.
//!
//! ## Submission
//!
//! [`Coordinator::submit`] makes sure the puzzle is cached, picks the part,
//! submits, and on success marks the part solved. Solving part 1 triggers a
//! refresh, since only then does the service disclose the part 2 question.

mod cache;
mod coordinator;
mod error;
mod gateway;
mod identity;
mod record;
pub mod schedule;
mod select;

// Re-export public API
pub use cache::PuzzleCache;
pub use coordinator::{Coordinator, RefreshPolicy, SubmitOutcome};
pub use error::{
    CacheError, IdentityError, InvariantViolation, Missing, PuzzleError, TransportError,
};
pub use gateway::{AnswerHint, RemoteGateway, SubmissionAttempt, Verdict};
pub use identity::{
    Candidate, DaySpec, ExplicitArgs, FIRST_YEAR, IdentityResolver, MAX_DAY, PathSegments,
    PuzzleIdentity, Resolution, ResolutionStrategy, resolve,
};
pub use record::{Part, PuzzleRecord, ScrapedPuzzle};
pub use select::{AlreadyComplete, select_part};
