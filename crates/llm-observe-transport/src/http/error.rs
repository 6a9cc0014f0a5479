//! Error types for reqwest-based delivery.

use llm_observe_core::ObserveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<Error> for ObserveError {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    ObserveError::Transport(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    ObserveError::Transport(format!("connection failed: {e}"))
                } else if e.is_decode() {
                    ObserveError::Transport(format!("malformed collector response: {e}"))
                } else {
                    ObserveError::Transport(e.to_string())
                }
            }
            Error::Serde(e) => ObserveError::Json(e),
        }
    }
}
