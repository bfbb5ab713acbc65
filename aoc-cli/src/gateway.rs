//! Adapter from the HTTP client to the puzzle workflow's gateway

use aoc_http_client::{AnswerHint as HttpHint, AocClient, AocError, SubmissionResult};
use aoc_puzzle::{
    AnswerHint, PuzzleIdentity, PuzzleRecord, RemoteGateway, ScrapedPuzzle, SubmissionAttempt,
    TransportError, Verdict,
};
use tracing::debug;

/// [`RemoteGateway`] backed by adventofcode.com
pub struct HttpGateway {
    client: AocClient,
}

impl HttpGateway {
    pub fn new(client: AocClient) -> Self {
        Self { client }
    }
}

impl RemoteGateway for HttpGateway {
    fn scrape(&self, identity: PuzzleIdentity) -> Result<PuzzleRecord, TransportError> {
        let (year, day) = (identity.year(), identity.day());
        let page = self.client.get_puzzle(year, day).map_err(transport)?;
        let input = self.client.get_input(year, day).map_err(transport)?;
        debug!(
            %identity,
            questions = page.questions.len(),
            answers = page.answers.len(),
            input_bytes = input.len(),
            "scraped puzzle"
        );

        Ok(PuzzleRecord::from_scrape(ScrapedPuzzle {
            questions: page.questions,
            answers: page.answers,
            input,
        }))
    }

    fn submit(&self, attempt: &SubmissionAttempt) -> Result<Verdict, TransportError> {
        let result = self
            .client
            .submit_answer(
                attempt.identity.year(),
                attempt.identity.day(),
                attempt.part.number(),
                &attempt.answer,
            )
            .map_err(transport)?;
        Ok(verdict(result))
    }
}

fn verdict(result: SubmissionResult) -> Verdict {
    match result {
        SubmissionResult::Correct => Verdict::Correct,
        SubmissionResult::Incorrect { hint } => Verdict::Incorrect {
            hint: hint.map(|hint| match hint {
                HttpHint::TooHigh => AnswerHint::TooHigh,
                HttpHint::TooLow => AnswerHint::TooLow,
            }),
        },
        SubmissionResult::AlreadyCompleted => Verdict::AlreadySolved,
        SubmissionResult::Throttled { wait_time } => Verdict::RateLimited { wait: wait_time },
    }
}

fn transport(e: AocError) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(e.to_string())
    } else {
        TransportError::new(e.to_string())
    }
}
