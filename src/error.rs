use thiserror::Error;

/// Failure categories surfaced by the portal client.
///
/// Callers can match on the variant to decide follow-up behaviour: a
/// `SessionExpired` means the stored credentials were already cleared and the
/// user must log in again, while `Request` carries the backend's own message
/// for form-level handling.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The refresh token was missing or rejected; the session is gone.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// The server answered 403 for an authenticated request.
    #[error("access denied")]
    AccessDenied,

    /// A 5xx response.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Any other 4xx response, including authentication bootstrap failures.
    #[error("request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// No response was received at all.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request construction or response decoding failed.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Status code of the failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } | ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A `Result` type that uses `ApiError` as the error type.
pub type Result<T> = std::result::Result<T, ApiError>;
