//! AOC HTTP Client Library
//!
//! This library provides utilities for interacting with the Advent of Code website:
//! puzzle page scraping, puzzle input fetching, and answer submission.
//!
//! # Features
//!
//! - Puzzle page scraping into plain-text questions and accepted answers
//! - Puzzle input fetching for any year and day
//! - Answer submission with detailed feedback, including too high/low hints
//! - Session cookie held in zeroizing memory and sent as a sensitive header
//! - Secure TLS using rustls (no OpenSSL dependencies)
//! - Blocking synchronous API with a request timeout
//!
//! # Example
//!
//! ```no_run
//! use aoc_http_client::{AocClient, SubmissionResult};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Your session cookie from adventofcode.com
//! let client = AocClient::new("your_session_cookie_here")?;
//!
//! // Scrape the puzzle statement
//! let page = client.get_puzzle(2024, 1)?;
//! println!("{}", page.questions[0]);
//!
//! // Fetch puzzle input
//! let input = client.get_input(2024, 1)?;
//!
//! // Submit an answer
//! let result = client.submit_answer(2024, 1, 1, "42")?;
//! match result {
//!     SubmissionResult::Correct => println!("Correct!"),
//!     SubmissionResult::Incorrect { hint } => println!("Incorrect {:?}", hint),
//!     SubmissionResult::AlreadyCompleted => println!("Already done"),
//!     SubmissionResult::Throttled { wait_time } => {
//!         println!("Throttled: {:?}", wait_time);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod parser;

pub use client::{
    AnswerHint, AocClient, AocClientBuilder, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, PuzzlePage,
    SubmissionResult,
};
pub use error::AocError;
