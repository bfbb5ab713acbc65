//! HTML response parsing utilities

use crate::{AnswerHint, PuzzlePage, SubmissionResult, error::AocError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::cell::OnceCell;
use std::time::Duration;

/// Wrap width for puzzle text rendered from HTML
const TEXT_WIDTH: usize = 80;

/// Parser for AOC HTML responses with cached regex patterns and selectors
#[derive(Clone, Debug)]
pub(crate) struct ResponseParser {
    throttle_regex: OnceCell<Regex>,
    main_selector: OnceCell<Selector>,
    question_selector: OnceCell<Selector>,
    answer_selector: OnceCell<Selector>,
}

impl ResponseParser {
    /// Create a new parser with uninitialized caches
    pub fn new() -> Self {
        Self {
            throttle_regex: OnceCell::new(),
            main_selector: OnceCell::new(),
            question_selector: OnceCell::new(),
            answer_selector: OnceCell::new(),
        }
    }

    /// Get or compile the throttle duration regex
    fn throttle_regex(&self) -> &Regex {
        self.throttle_regex
            .get_or_init(|| Regex::new(r"You have (.+?) left to wait\.").unwrap())
    }

    /// Get or compile the main element selector
    fn main_selector(&self) -> &Selector {
        self.main_selector
            .get_or_init(|| Selector::parse("main").unwrap())
    }

    /// One `article.day-desc` per disclosed part
    fn question_selector(&self) -> &Selector {
        self.question_selector
            .get_or_init(|| Selector::parse("article.day-desc").unwrap())
    }

    /// Accepted answers follow their part's article as `<p>Your puzzle answer was <code>..</code>`
    fn answer_selector(&self) -> &Selector {
        self.answer_selector
            .get_or_init(|| Selector::parse("article.day-desc + p code").unwrap())
    }

    /// Extract text content from the main element of an HTML document
    pub fn extract_main_text(&self, html: &str) -> Result<String, AocError> {
        let document = Html::parse_document(html);
        let selector = self.main_selector();

        let main_element = document
            .select(selector)
            .next()
            .ok_or(AocError::HtmlParse)?;

        Ok(main_element.text().collect::<String>())
    }

    /// Extract the question texts and accepted answers from a puzzle page
    ///
    /// A page without any question article is rejected, since every released
    /// puzzle shows at least part 1.
    pub fn parse_puzzle_page(&self, html: &str) -> Result<PuzzlePage, AocError> {
        let document = Html::parse_document(html);

        let questions = document
            .select(self.question_selector())
            .map(render_text)
            .collect::<Result<Vec<_>, _>>()?;
        if questions.is_empty() {
            return Err(AocError::HtmlParse);
        }

        let answers = document
            .select(self.answer_selector())
            .map(|code| code.text().collect::<String>())
            .collect();

        Ok(PuzzlePage { questions, answers })
    }

    /// Extract throttle duration from response text
    fn extract_throttle_duration(&self, text: &str) -> Option<Duration> {
        let regex = self.throttle_regex();
        let captures = regex.captures(text)?;
        let duration_str = captures.get(1)?.as_str();
        humantime::parse_duration(duration_str).ok()
    }

    /// Parse submission response and determine the result
    pub fn parse_submission_response(&self, html: &str) -> Result<SubmissionResult, AocError> {
        let text = self.extract_main_text(html)?;

        // Check for incorrect answer
        if text.contains("not the right answer") {
            let hint = if text.contains("answer is too high") {
                Some(AnswerHint::TooHigh)
            } else if text.contains("answer is too low") {
                Some(AnswerHint::TooLow)
            } else {
                None
            };
            return Ok(SubmissionResult::Incorrect { hint });
        }

        // Check for already completed
        if text.contains("already complete it") {
            return Ok(SubmissionResult::AlreadyCompleted);
        }

        // Check for throttling
        if text.contains("gave an answer too recently") {
            let wait_time = self.extract_throttle_duration(&text);
            return Ok(SubmissionResult::Throttled { wait_time });
        }

        if text.contains("That's the right answer") {
            return Ok(SubmissionResult::Correct);
        }

        Err(AocError::UnexpectedResponse(text.trim().to_string()))
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

fn render_text(element: ElementRef<'_>) -> Result<String, AocError> {
    html2text::from_read(element.inner_html().as_bytes(), TEXT_WIDTH)
        .map_err(|_| AocError::HtmlParse)
}
