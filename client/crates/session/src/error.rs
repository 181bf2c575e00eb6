//! Session Error Types
//!
//! This module provides session-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::secret::PasswordPolicyError;
use platform::storage::StorageError;
use platform::transport::TransportError;
use thiserror::Error;

use crate::domain::value_object::session_status::SessionStatus;

/// Session-specific result type alias
pub type SessionResult<T> = Result<T, SessionError>;

/// Outcome of a failed refresh exchange
///
/// Cloneable because a single failure is handed to every request that was
/// waiting on the same in-flight refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Session refresh failed: {message}")]
pub struct RefreshFailure {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl RefreshFailure {
    pub fn from_app_error(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            status: err.status(),
            message: err.message().to_string(),
        }
    }

    /// No refresh credential to exchange
    pub fn no_credential() -> Self {
        Self {
            kind: ErrorKind::Unauthorized,
            status: None,
            message: "No refresh credential available".to_string(),
        }
    }

    /// The session changed (logout or a new login) while the exchange ran
    pub fn superseded() -> Self {
        Self {
            kind: ErrorKind::Unauthorized,
            status: None,
            message: "Session changed during refresh".to_string(),
        }
    }
}

impl From<&SessionError> for RefreshFailure {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::Api(app) => Self::from_app_error(app),
            SessionError::Refresh(failure) => failure.clone(),
            other => Self {
                kind: other.kind(),
                status: None,
                message: other.to_string(),
            },
        }
    }
}

impl From<RefreshFailure> for AppError {
    fn from(failure: RefreshFailure) -> Self {
        AppError::new(failure.kind, failure.message.clone())
            .with_action("Sign in again")
            .with_source(failure)
    }
}

/// Session-specific error variants
#[derive(Debug, Error)]
pub enum SessionError {
    /// Backend rejected a login/register call, or any other API error
    #[error("{0}")]
    Api(AppError),

    /// The backend answered with a payload we cannot use
    #[error("Malformed authentication response: {0}")]
    MalformedGrant(String),

    /// Client-side password policy rejected the input
    #[error("Password rejected: {0}")]
    Password(#[from] PasswordPolicyError),

    /// Refresh exchange failed
    #[error(transparent)]
    Refresh(#[from] RefreshFailure),

    /// Operation not allowed in the current session state
    #[error("Session cannot go from {from} to {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    /// Durable storage failure
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// Stored session document cannot be decoded
    #[error("Stored session is corrupt: {0}")]
    CorruptStorage(String),

    /// Transport failure before any response was received
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SessionError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Api(err) => err.kind(),
            SessionError::MalformedGrant(_) => ErrorKind::Decode,
            SessionError::Password(_) => ErrorKind::BadRequest,
            SessionError::Refresh(failure) => failure.kind,
            SessionError::InvalidTransition { .. }
            | SessionError::Storage(_)
            | SessionError::CorruptStorage(_) => ErrorKind::Internal,
            SessionError::Transport(TransportError::InvalidBody { .. }) => ErrorKind::Decode,
            SessionError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            SessionError::Storage(e) => {
                tracing::error!(error = %e, "Session storage error");
            }
            SessionError::CorruptStorage(msg) => {
                tracing::error!(message = %msg, "Stored session is corrupt");
            }
            SessionError::InvalidTransition { from, to } => {
                tracing::error!(%from, %to, "Invalid session transition");
            }
            SessionError::Refresh(failure) => {
                tracing::warn!(error = %failure, "Session refresh failed");
            }
            SessionError::Api(err) if err.is_unauthorized() => {
                tracing::warn!("Authentication rejected by backend");
            }
            _ => {
                tracing::debug!(error = %self, "Session error");
            }
        }
    }
}

impl From<AppError> for SessionError {
    fn from(err: AppError) -> Self {
        SessionError::Api(err)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Api(app) => app,
            SessionError::Refresh(failure) => failure.into(),
            SessionError::Transport(transport) => transport.into(),
            SessionError::Storage(storage) => storage.into(),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_failure_from_app_error() {
        let err = AppError::from_response(401, None);
        let failure = RefreshFailure::from_app_error(&err);
        assert_eq!(failure.kind, ErrorKind::Unauthorized);
        assert_eq!(failure.status, Some(401));
    }

    #[test]
    fn test_session_error_kinds() {
        assert_eq!(
            SessionError::MalformedGrant("x".to_string()).kind(),
            ErrorKind::Decode
        );
        assert_eq!(
            SessionError::Password(PasswordPolicyError::EmptyOrWhitespace).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            SessionError::Transport(TransportError::Timeout).kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn test_api_error_passes_through_unchanged() {
        let err = SessionError::Api(AppError::from_response(422, None));
        let app: AppError = err.into();
        assert_eq!(app.status(), Some(422));
    }
}
