//! Error types for the chat client.

use thiserror::Error;

/// Result type alias for chat client operations.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Main error type for the chat client.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Request(#[from] RequestFailure),

    #[error("Stream failed: {0}")]
    Stream(#[from] StreamFailure),
}

impl ChatError {
    /// Whether the failure happened before the response body started.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, ChatError::Request(_))
    }

    /// Whether the failure happened while consuming the response body.
    pub fn is_stream_failure(&self) -> bool {
        matches!(self, ChatError::Stream(_))
    }
}

/// Errors issuing the request or receiving the response head.
#[derive(Error, Debug)]
pub enum RequestFailure {
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid reply: {0}")]
    InvalidReply(String),
}

/// Errors after a successful response start.
#[derive(Error, Debug)]
pub enum StreamFailure {
    #[error("Read error: {0}")]
    Read(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Invalid UTF-8 in the response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid UTF-8 sequence at byte {offset}")]
pub struct DecodeError {
    /// Offset of the first invalid byte in the decoded input, counting
    /// bytes carried over from the previous chunk first.
    pub offset: usize,
}
