//! Error types for remote API calls.

use thiserror::Error;

/// Failure of a single API call.
///
/// Every failure is scoped to the action that triggered it; nothing here is
/// fatal to the client. Reducer-level validation failures never become an
/// `ApiError` — they are caught before any call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, TLS, mid-body disconnect).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    ///
    /// `message` carries the server's JSON `detail` field when the body
    /// parses, otherwise the raw body, otherwise the canonical status reason.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Server-supplied detail or raw body
        message: String,
    },

    /// A 2xx body that failed to decode.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for display.
    ///
    /// Server-supplied detail takes precedence; transport and decode
    /// failures fall back to the per-action string the caller provides.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// True for a 401, which callers treat as "session no longer valid".
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}
