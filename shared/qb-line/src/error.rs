//! Messaging API Error Types

use thiserror::Error;

/// Errors from the Messaging API client.
#[derive(Debug, Error)]
pub enum LineError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("LINE API returned {status}: {body}")]
    Api { status: u16, body: String },
}
