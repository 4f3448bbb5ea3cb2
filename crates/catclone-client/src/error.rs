//! Client error types.

use catclone_core::SessionError;
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The warehouse ran the statement and it failed.
    #[error("statement {state}: {message}")]
    StatementFailed {
        /// Terminal statement state.
        state: String,
        /// Warehouse error message.
        message: String,
    },

    /// The statement did not finish before the deadline.
    #[error("statement timed out")]
    Timeout,

    /// The response could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Convert into the session error reported for `sql`.
    pub fn into_session_error(self, sql: &str) -> SessionError {
        match self {
            Error::StatementFailed { state, message } => {
                SessionError::statement(sql, format!("{}: {}", state, message))
            }
            Error::Timeout => SessionError::Timeout,
            Error::InvalidResponse(message) => SessionError::Protocol(message),
            other => SessionError::Transport(other.to_string()),
        }
    }
}
