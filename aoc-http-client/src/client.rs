//! AOC HTTP client implementation

use crate::error::AocError;
use crate::parser::ResponseParser;
use reqwest::header::HeaderValue;
use std::fmt;
use std::time::Duration;
use zeroize::{Zeroize, Zeroizing};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!(
    "aoc-http-client/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/khangp0000/my-aoc-kit)"
);

const DEFAULT_BASE_URL: &str = "https://adventofcode.com";

/// Direction hint given for some wrong answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerHint {
    /// The proposed answer is above the right one
    TooHigh,
    /// The proposed answer is below the right one
    TooLow,
}

/// Result of an answer submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// Answer was correct
    Correct,
    /// Answer was incorrect
    Incorrect {
        /// Whether the answer was too high or too low, when the site says so
        hint: Option<AnswerHint>,
    },
    /// Problem was already completed
    AlreadyCompleted,
    /// Submission was throttled
    Throttled {
        /// Optional wait time before next submission
        wait_time: Option<Duration>,
    },
}

/// Text scraped from a puzzle page
///
/// `questions` holds one entry per disclosed part, rendered to plain text.
/// `answers` holds the accepted answers shown below each solved part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzlePage {
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

/// The main AOC HTTP client
///
/// This client provides methods for interacting with the Advent of Code website:
/// scraping puzzle pages, fetching inputs and submitting answers. The session
/// cookie is supplied once at construction and kept in zeroizing memory.
///
/// # Example
///
/// ```no_run
/// use aoc_http_client::AocClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AocClient::new("your_session_cookie")?;
///
/// let page = client.get_puzzle(2024, 1)?;
/// println!("{}", page.questions[0]);
///
/// let input = client.get_input(2024, 1)?;
/// println!("Input: {}", input);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AocClient {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
    parser: ResponseParser,
    session: Zeroizing<String>,
}

impl fmt::Debug for AocClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AocClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl AocClient {
    /// Create a client for adventofcode.com with default settings
    ///
    /// # Errors
    ///
    /// Returns `AocError::MissingSession` for an empty session and
    /// `AocError::ClientInit` if the HTTP client cannot be initialized.
    pub fn new(session: impl Into<String>) -> Result<Self, AocError> {
        Self::builder().session(session).build()
    }

    /// Create a builder for configuring the AOC client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use aoc_http_client::AocClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = AocClient::builder()
    ///     .session("your_session_cookie")
    ///     .base_url("http://localhost:1234")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> AocClientBuilder {
        AocClientBuilder::new()
    }

    /// Create a secure cookie header value from the stored session
    ///
    /// The header is marked sensitive and the temporary string is zeroized.
    fn cookie_header(&self) -> Result<HeaderValue, AocError> {
        let mut cookie_string = format!("session={}", self.session.as_str());
        let header_value = HeaderValue::from_bytes(cookie_string.as_bytes())
            .map_err(|_| AocError::ClientInit("Invalid session cookie format".to_string()));
        cookie_string.zeroize();

        let mut sensitive_header = header_value?;
        sensitive_header.set_sensitive(true);
        Ok(sensitive_header)
    }

    /// `{base}/{year}/day/{day}` followed by `extra` segments
    fn day_url(&self, year: u16, day: u8, extra: &[&str]) -> Result<reqwest::Url, AocError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AocError::ClientInit("Cannot modify base URL path".to_string()))?
            .clear()
            .extend(&[&year.to_string(), "day", &day.to_string()])
            .extend(extra);
        Ok(url)
    }

    fn get_text(&self, url: reqwest::Url) -> Result<String, AocError> {
        let response = self
            .client
            .get(url)
            .header("Cookie", self.cookie_header()?)
            .send()?;

        if !response.status().is_success() {
            return Err(AocError::InvalidStatus {
                status: response.status(),
            });
        }

        response.text().map_err(|_| AocError::Encoding)
    }

    /// Fetch and parse the puzzle page for a specific year and day
    ///
    /// Only parts the session has unlocked are present: a fresh puzzle yields
    /// one question, and the part 2 question appears once part 1 is solved.
    ///
    /// # Errors
    ///
    /// * `AocError::Request` - Network error or timeout
    /// * `AocError::InvalidStatus` - HTTP error (e.g., 404 if puzzle not available)
    /// * `AocError::Encoding` - Response is not valid UTF-8
    /// * `AocError::HtmlParse` - The page shows no puzzle description
    pub fn get_puzzle(&self, year: u16, day: u8) -> Result<PuzzlePage, AocError> {
        let html = self.get_text(self.day_url(year, day, &[])?)?;
        self.parser.parse_puzzle_page(&html)
    }

    /// Fetch puzzle input for a specific year and day
    ///
    /// Downloads the personalized puzzle input for the given year and day.
    ///
    /// # Errors
    ///
    /// * `AocError::Request` - Network error or timeout
    /// * `AocError::InvalidStatus` - HTTP error (e.g., 404 if puzzle not available)
    /// * `AocError::Encoding` - Response is not valid UTF-8
    ///
    /// # Example
    ///
    /// ```no_run
    /// use aoc_http_client::AocClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = AocClient::new("your_session_cookie")?;
    ///
    /// let input = client.get_input(2024, 1)?;
    /// println!("Input length: {} bytes", input.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_input(&self, year: u16, day: u8) -> Result<String, AocError> {
        self.get_text(self.day_url(year, day, &["input"])?)
    }

    /// Submit an answer for a puzzle part
    ///
    /// Submits an answer to AOC and parses the response to determine the result.
    ///
    /// # Returns
    ///
    /// A `SubmissionResult` indicating the outcome:
    /// * `Correct` - Answer was correct
    /// * `Incorrect` - Answer was incorrect, possibly with a too high/low hint
    /// * `AlreadyCompleted` - Problem was already solved
    /// * `Throttled` - Submission was rate-limited (includes optional wait time)
    ///
    /// # Errors
    ///
    /// * `AocError::Request` - Network error or timeout
    /// * `AocError::InvalidStatus` - HTTP error
    /// * `AocError::Encoding` - Response is not valid UTF-8
    /// * `AocError::HtmlParse` - Response has no main element
    /// * `AocError::UnexpectedResponse` - Response matched no known outcome
    ///
    /// # Example
    ///
    /// ```no_run
    /// use aoc_http_client::{AocClient, SubmissionResult};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = AocClient::new("your_session_cookie")?;
    ///
    /// match client.submit_answer(2024, 1, 1, "42")? {
    ///     SubmissionResult::Correct => println!("Correct!"),
    ///     SubmissionResult::Incorrect { hint } => println!("Try again ({:?})", hint),
    ///     SubmissionResult::AlreadyCompleted => println!("Already done"),
    ///     SubmissionResult::Throttled { wait_time } => {
    ///         println!("Wait: {:?}", wait_time);
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn submit_answer(
        &self,
        year: u16,
        day: u8,
        part: u8,
        answer: &str,
    ) -> Result<SubmissionResult, AocError> {
        let url = self.day_url(year, day, &["answer"])?;
        let form = [("level", part.to_string()), ("answer", answer.to_string())];

        let response = self
            .client
            .post(url)
            .header("Cookie", self.cookie_header()?)
            .form(&form)
            .send()?;

        if !response.status().is_success() {
            return Err(AocError::InvalidStatus {
                status: response.status(),
            });
        }

        let html = response.text().map_err(|_| AocError::Encoding)?;
        self.parser.parse_submission_response(&html)
    }
}

/// Builder for configuring an AOC HTTP client
///
/// A session is required. Redirects are never followed, so an expired session
/// surfaces as an error status instead of the site's login page.
///
/// # Example
///
/// ```no_run
/// use aoc_http_client::AocClient;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Default settings
/// let client = AocClient::builder().session("cookie").build()?;
///
/// // Custom base URL and timeout for testing
/// let client = AocClient::builder()
///     .session("cookie")
///     .base_url("http://localhost:1234")?
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct AocClientBuilder {
    session: Option<Zeroizing<String>>,
    base_url: Option<reqwest::Url>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    client_builder: Option<reqwest::blocking::ClientBuilder>,
}

impl fmt::Debug for AocClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AocClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl AocClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            session: None,
            base_url: None,
            timeout: None,
            user_agent: None,
            client_builder: None,
        }
    }

    /// Set the session cookie value (without the `session=` prefix)
    pub fn session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(Zeroizing::new(session.into()));
        self
    }

    /// Set a custom base URL for the client
    ///
    /// This is useful for testing with mock servers. The URL is parsed and validated
    /// at builder time, catching errors early.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self, AocError> {
        self.base_url = Some(url.into_url()?);
        Ok(self)
    }

    /// Set the per-request timeout, [`DEFAULT_TIMEOUT`] when unset
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header, [`DEFAULT_USER_AGENT`] when unset
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set a custom HTTP client builder
    ///
    /// This allows full customization of the HTTP client (proxies, TLS, etc.).
    /// The redirect policy is always overridden to `Policy::none()`, and the
    /// timeout and user agent from this builder are applied on top.
    pub fn client_builder(mut self, builder: reqwest::blocking::ClientBuilder) -> Self {
        self.client_builder = Some(builder);
        self
    }

    /// Build the AOC client with the configured settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No session, or an empty one, was set
    /// - The HTTP client cannot be initialized
    pub fn build(self) -> Result<AocClient, AocError> {
        let session = match self.session {
            Some(session) if !session.trim().is_empty() => session,
            _ => return Err(AocError::MissingSession),
        };

        let base_url = match self.base_url {
            Some(url) => url,
            None => reqwest::Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| AocError::ClientInit(e.to_string()))?,
        };

        let builder = self
            .client_builder
            .unwrap_or_else(|| reqwest::blocking::Client::builder().use_rustls_tls());

        let client = builder
            .redirect(reqwest::redirect::Policy::none())
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            )
            .build()
            .map_err(|e| AocError::ClientInit(e.to_string()))?;

        Ok(AocClient {
            client,
            base_url,
            parser: ResponseParser::new(),
            session,
        })
    }
}

impl Default for AocClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
