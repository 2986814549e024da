//! Error types for the catalog and favorites clients.

use thiserror::Error;

/// Result type for remote API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised by the remote clients.
#[derive(Error, Debug)]
pub enum ApiError {
  /// The read API answered with a non-success status, or could not be reached.
  #[error("Failed fetching {target}: {reason}")]
  Fetch {
    /// What was being fetched (e.g. "people", "planets 3").
    target: String,
    /// Status line or transport message.
    reason: String,
  },

  /// The favorites backend answered with a non-success status.
  #[error("Backend error {status}: {body}")]
  Backend {
    /// HTTP status code.
    status: u16,
    /// Response body text.
    body: String,
  },

  /// The favorites backend could not be reached or sent an unreadable body.
  #[error("Backend request failed: {0}")]
  Transport(#[from] reqwest::Error),
}

impl ApiError {
  pub(crate) fn fetch(target: impl Into<String>, reason: impl ToString) -> Self {
    Self::Fetch {
      target: target.into(),
      reason: reason.to_string(),
    }
  }
}
