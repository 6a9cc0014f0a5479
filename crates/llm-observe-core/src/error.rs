//! Error taxonomy for the observation layer.
//!
//! None of these errors ever reach the caller of an observed LLM call: the
//! interception layer downgrades them to diagnostics. They exist so the
//! transport and installation paths can report *why* a record was dropped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObserveError {
    /// The collector could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The collector answered with a non-2xx status.
    #[error("collector responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Installing the observation layer failed; calls pass through unobserved.
    #[error("installation failed: {0}")]
    Install(String),
}

pub type Result<T> = std::result::Result<T, ObserveError>;
