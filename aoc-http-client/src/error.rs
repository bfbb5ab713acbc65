//! Error types for the AOC HTTP client

use thiserror::Error;

/// Errors that can occur when using the AOC HTTP client
#[derive(Error, Debug)]
pub enum AocError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid HTTP status code received
    #[error("Invalid HTTP status: {status}")]
    InvalidStatus {
        /// The status code that was received
        status: reqwest::StatusCode,
    },

    /// Failed to decode response as UTF-8
    #[error("Failed to decode response as UTF-8")]
    Encoding,

    /// Failed to parse HTML response
    #[error("Failed to parse HTML response")]
    HtmlParse,

    /// Submission response matched none of the known messages
    #[error("Unrecognized submission response: {0}")]
    UnexpectedResponse(String),

    /// No session cookie was configured
    #[error("A session cookie is required")]
    MissingSession,

    /// Client initialization failed
    #[error("Client initialization failed: {0}")]
    ClientInit(String),
}

impl AocError {
    /// Whether the error comes from a request that exceeded its timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, AocError::Request(e) if e.is_timeout())
    }
}
