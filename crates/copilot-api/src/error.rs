//! Error types for the gateway.

use thiserror::Error;

/// Errors produced by gateway operations.
///
/// Backend rejections and transport failures are kept apart because
/// the screens treat them differently: `Api` messages surface to the
/// user verbatim, `Cancelled` is swallowed silently, and everything
/// else renders as a generic connection problem.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status. The message is
    /// the body's `detail` field when present, else the canonical
    /// reason phrase of the status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Normalized error message.
        message: String,
    },

    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The caller cancelled the request before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    /// True for caller-triggered cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// HTTP status for backend rejections, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, ClientError>;
