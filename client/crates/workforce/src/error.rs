//! Workforce Error Types
//!
//! This module provides workforce-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::Serialize;
use serde_json::Value;
use session::UserRole;
use thiserror::Error;

/// Workforce-specific result type alias
pub type WorkforceResult<T> = Result<T, WorkforceError>;

/// Workforce-specific error variants
#[derive(Debug, Error)]
pub enum WorkforceError {
    /// Backend or transport error, unchanged
    #[error("{0}")]
    Api(#[from] AppError),

    /// A 2xx payload did not have the expected shape
    #[error("Unexpected {what} payload: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The signed-in role may not perform this action
    #[error("Role '{role}' may not {action}")]
    NotPermitted {
        role: UserRole,
        action: &'static str,
    },
}

impl WorkforceError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkforceError::Api(err) => err.kind(),
            WorkforceError::Decode { .. } => ErrorKind::Decode,
            WorkforceError::NotPermitted { .. } => ErrorKind::Forbidden,
        }
    }

    /// Backend status, if the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            WorkforceError::Api(err) => err.status(),
            _ => None,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            WorkforceError::Decode { what, source } => {
                tracing::error!(what = %what, error = %source, "Unexpected backend payload");
            }
            WorkforceError::Api(err) if err.is_server_error() => {
                tracing::warn!(error = %err, "Backend error");
            }
            _ => {
                tracing::debug!(error = %self, "Workforce error");
            }
        }
    }
}

impl From<WorkforceError> for AppError {
    fn from(err: WorkforceError) -> Self {
        match err {
            WorkforceError::Api(app) => app,
            WorkforceError::NotPermitted { .. } => {
                AppError::forbidden(err.to_string()).with_action("Sign in with a permitted account")
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

/// Last failure of a state container
///
/// A cloneable digest of the error, kept in published state the way the
/// backend reported it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl From<&WorkforceError> for ErrorReport {
    fn from(err: &WorkforceError) -> Self {
        match err {
            WorkforceError::Api(app) => Self {
                kind: app.kind(),
                status: app.status(),
                message: app.message().to_string(),
                payload: app.payload().cloned(),
            },
            other => Self {
                kind: other.kind(),
                status: None,
                message: other.to_string(),
                payload: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_keeps_backend_payload() {
        let err = WorkforceError::from(AppError::from_response(
            422,
            Some(json!({"errors": ["Email has already been taken"]})),
        ));
        let report = ErrorReport::from(&err);
        assert_eq!(report.status, Some(422));
        assert_eq!(report.message, "Email has already been taken");
        assert!(report.payload.is_some());
    }

    #[test]
    fn test_not_permitted_is_forbidden() {
        let err = WorkforceError::NotPermitted {
            role: UserRole::Employee,
            action: "manage users",
        };
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let app: AppError = err.into();
        assert_eq!(app.kind(), ErrorKind::Forbidden);
        assert!(app.action().is_some());
    }
}
