//! Output formatting for puzzles and submission outcomes

use crate::error::Exit;
use aoc_puzzle::{Part, PuzzleIdentity, PuzzleRecord, SubmitOutcome};
use chrono::{Local, TimeDelta};
use std::path::Path;
use std::time::Duration;

/// Output formatter for command results
pub struct OutputFormatter {
    quiet: bool,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print a submission outcome and return the matching exit status
    pub fn print_outcome(&self, identity: PuzzleIdentity, outcome: &SubmitOutcome) -> Exit {
        if self.quiet {
            println!("{}", outcome_word(outcome));
        } else {
            println!("{}", format_outcome(identity, outcome));
        }
        outcome_exit(outcome)
    }

    /// Print where `get` put the puzzle files
    pub fn print_written(&self, identity: PuzzleIdentity, dest: &Path) {
        if self.quiet {
            return;
        }
        println!("{}: wrote puzzle.md and input to {}", identity, dest.display());
    }

    /// Print a puzzle to stdout
    pub fn print_record(&self, record: &PuzzleRecord, answers: bool) {
        print!("{}", render_record(record, answers));
    }
}

/// Plain-text rendering of a puzzle: each disclosed question, optionally
/// followed by its accepted answer
pub fn render_record(record: &PuzzleRecord, answers: bool) -> String {
    let mut out = String::new();
    for part in Part::ALL {
        let Some(question) = record.question(part) else {
            continue;
        };
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(question.trim_end());
        out.push('\n');

        if answers {
            match (record.answer(part), record.is_solved(part)) {
                (Some(answer), _) => out.push_str(&format!("\nYour puzzle answer was `{}`.\n", answer)),
                (None, true) => out.push_str("\nSolved.\n"),
                (None, false) => {}
            }
        }
    }
    out
}

fn outcome_exit(outcome: &SubmitOutcome) -> Exit {
    match outcome {
        SubmitOutcome::Accepted { .. } => Exit::Success,
        SubmitOutcome::Rejected { .. } => Exit::Rejected,
        SubmitOutcome::Throttled { .. } => Exit::Throttled,
    }
}

fn outcome_word(outcome: &SubmitOutcome) -> &'static str {
    match outcome {
        SubmitOutcome::Accepted { .. } => "correct",
        SubmitOutcome::Rejected { .. } => "incorrect",
        SubmitOutcome::Throttled { .. } => "throttled",
    }
}

/// Format a submission outcome for display
fn format_outcome(identity: PuzzleIdentity, outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Accepted {
            part,
            refreshed,
            record,
        } => {
            let prefix = format!("{} Part {}", identity, part);
            if record.is_complete() {
                format!("{}: ✓ Correct, puzzle complete", prefix)
            } else if *refreshed {
                format!("{}: ✓ Correct, part 2 unlocked", prefix)
            } else {
                format!("{}: ✓ Correct", prefix)
            }
        }
        SubmitOutcome::Rejected { part, hint } => match hint {
            Some(hint) => format!("{} Part {}: ✗ Incorrect ({})", identity, part, hint),
            None => format!("{} Part {}: ✗ Incorrect", identity, part),
        },
        SubmitOutcome::Throttled { part, wait } => match wait {
            Some(d) => format!(
                "{} Part {}: ⏳ Throttled (wait {}, until {})",
                identity,
                part,
                humantime::format_duration(*d),
                retry_at(*d)
            ),
            None => format!("{} Part {}: ⏳ Throttled", identity, part),
        },
    }
}

/// Local wall-clock time after `wait`
fn retry_at(wait: Duration) -> String {
    let now = Local::now();
    TimeDelta::from_std(wait)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(now)
        .format("%H:%M:%S")
        .to_string()
}
