//! Cached representation of a single puzzle

use crate::error::{IdentityError, InvariantViolation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One of the two sub-problems of a day's puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Part {
    One = 1,
    Two = 2,
}

impl Part {
    /// Both parts in order
    pub const ALL: [Part; 2] = [Part::One, Part::Two];

    /// The part number as shown on the puzzle page (1 or 2)
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl From<Part> for u8 {
    fn from(part: Part) -> Self {
        part.number()
    }
}

impl TryFrom<u8> for Part {
    type Error = IdentityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Part::One),
            2 => Ok(Part::Two),
            other => Err(IdentityError::InvalidPart(other)),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Structured content of a puzzle page as returned by a scrape
///
/// `questions` and `answers` are in page order: the first entry belongs to
/// part 1, the second to part 2.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedPuzzle {
    pub questions: Vec<String>,
    pub answers: Vec<String>,
    pub input: String,
}

/// Cached state of one puzzle
///
/// Consistency rules, checked by [`PuzzleRecord::validate`]:
/// - part 2 solved implies part 1 solved
/// - an answer is only recorded for a solved part
/// - the part 2 question is only present once part 1 is solved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    pub question_part1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_part2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_part1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_part2: Option<String>,
    pub input: String,
    #[serde(default)]
    pub solved: BTreeSet<Part>,
}

impl PuzzleRecord {
    /// Build a record from scraped page content
    ///
    /// Progress is derived from what the page discloses: a visible answer
    /// means the part is solved, and a visible part 2 question means part 1 is.
    pub fn from_scrape(scraped: ScrapedPuzzle) -> Self {
        let mut questions = scraped
            .questions
            .into_iter()
            .filter(|q| !q.trim().is_empty());
        let mut answers = scraped.answers.into_iter().filter(|a| !a.trim().is_empty());

        let mut record = Self {
            question_part1: questions.next().unwrap_or_default(),
            question_part2: questions.next(),
            answer_part1: answers.next(),
            answer_part2: answers.next(),
            input: scraped.input,
            solved: BTreeSet::new(),
        };
        record.normalize();
        record
    }

    pub fn question(&self, part: Part) -> Option<&str> {
        match part {
            Part::One => Some(self.question_part1.as_str()).filter(|q| !q.is_empty()),
            Part::Two => self.question_part2.as_deref(),
        }
    }

    pub fn answer(&self, part: Part) -> Option<&str> {
        match part {
            Part::One => self.answer_part1.as_deref(),
            Part::Two => self.answer_part2.as_deref(),
        }
    }

    pub fn is_solved(&self, part: Part) -> bool {
        self.solved.contains(&part)
    }

    /// Whether both parts are solved
    pub fn is_complete(&self) -> bool {
        Part::ALL.iter().all(|part| self.is_solved(*part))
    }

    /// Mark `part` as solved, recording the answer when it is known
    ///
    /// Solving part 2 implies part 1.
    pub fn mark_solved(&mut self, part: Part, answer: Option<String>) {
        self.solved.insert(part);
        if part == Part::Two {
            self.solved.insert(Part::One);
        }
        if let Some(answer) = answer {
            match part {
                Part::One => self.answer_part1 = Some(answer),
                Part::Two => self.answer_part2 = Some(answer),
            }
        }
    }

    /// Combine a freshly scraped record with this one
    ///
    /// Content present in `fresh` replaces the stored content, content it lacks
    /// is kept, and solved parts are never dropped.
    pub fn merge(self, fresh: PuzzleRecord) -> PuzzleRecord {
        let mut merged = fresh;
        merged.fill_from(&self);
        merged
    }

    /// Fill gaps in `self` from `older` and keep every solved part of `older`
    pub(crate) fn fill_from(&mut self, older: &PuzzleRecord) {
        if self.question_part1.is_empty() {
            self.question_part1.clone_from(&older.question_part1);
        }
        if self.question_part2.is_none() {
            self.question_part2.clone_from(&older.question_part2);
        }
        if self.answer_part1.is_none() {
            self.answer_part1.clone_from(&older.answer_part1);
        }
        if self.answer_part2.is_none() {
            self.answer_part2.clone_from(&older.answer_part2);
        }
        if self.input.is_empty() {
            self.input.clone_from(&older.input);
        }
        self.solved.extend(older.solved.iter().copied());
        self.normalize();
    }

    /// Check the consistency rules
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.is_solved(Part::Two) && !self.is_solved(Part::One) {
            return Err(InvariantViolation::PartTwoWithoutPartOne);
        }
        for part in Part::ALL {
            if self.answer(part).is_some() && !self.is_solved(part) {
                return Err(InvariantViolation::AnswerWithoutSolved(part));
            }
        }
        if self.question_part2.is_some() && !self.is_solved(Part::One) {
            return Err(InvariantViolation::QuestionTwoBeforePartOne);
        }
        Ok(())
    }

    fn normalize(&mut self) {
        if self.answer_part2.is_some() {
            self.solved.insert(Part::Two);
        }
        if self.answer_part1.is_some()
            || self.question_part2.is_some()
            || self.solved.contains(&Part::Two)
        {
            self.solved.insert(Part::One);
        }
    }
}
