//! Client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// An order field failed wire-format validation before any request
    /// was sent.
    #[error("invalid wire value for {field}: {value}")]
    Serialization { field: &'static str, value: String },

    /// The service answered with a non-success status.
    #[error("orderbook rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
