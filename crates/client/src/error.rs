//! Error types for API calls.

use clubdesk_core::DomainError;
use thiserror::Error;

use crate::CredentialError;

/// Everything an API call can fail with.
///
/// The variants follow how the front-end reacts: validation errors are shown inline and
/// never reach the network; `SessionExpired` sends the user back to the login entry;
/// `Unauthorized` is a bad password on the login form; the rest are shown next to the
/// action that triggered them. Nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caught before submission.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// The server rejected the stored credential. The credential has already been
    /// cleared and the expiry signal published.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// An authentication endpoint answered 401 (bad username or password).
    #[error("invalid username or password")]
    Unauthorized,

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }

    /// HTTP status behind the error, when there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::SessionExpired | ApiError::Unauthorized => Some(401),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_display_the_domain_message() {
        let err: ApiError = DomainError::MissingField("email").into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "missing required field: email");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn api_errors_keep_status() {
        let err = ApiError::Api {
            status: 409,
            message: "email already used".to_string(),
        };
        assert_eq!(err.to_string(), "API error (409): email already used");
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_session_expired());
    }

    #[test]
    fn both_401_flavours_report_401() {
        assert_eq!(ApiError::SessionExpired.status(), Some(401));
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        assert!(ApiError::SessionExpired.is_session_expired());
    }
}
