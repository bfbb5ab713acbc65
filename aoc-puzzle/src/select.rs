//! Choice of the part an unqualified submission targets

use crate::record::{Part, PuzzleRecord};
use thiserror::Error;

/// Nothing left to submit for a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("both parts are already solved")]
pub struct AlreadyComplete;

/// First part of `record` that is not solved yet
pub fn select_part(record: &PuzzleRecord) -> Result<Part, AlreadyComplete> {
    Part::ALL
        .into_iter()
        .find(|part| !record.is_solved(*part))
        .ok_or(AlreadyComplete)
}
