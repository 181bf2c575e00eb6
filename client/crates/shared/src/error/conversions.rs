//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::TimedOut
            | std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted => ErrorKind::Transport,
            _ => ErrorKind::Internal,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::decode(format!("JSON decode error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// HTTP type conversions (feature-gated)
// ============================================================================

#[cfg(feature = "http")]
impl From<http::StatusCode> for ErrorKind {
    fn from(status: http::StatusCode) -> Self {
        ErrorKind::from_status(status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::Transport);

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::Decode);
        assert_eq!(app_err.status(), None);
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_status_code_conversion() {
        let kind: ErrorKind = http::StatusCode::UNAUTHORIZED.into();
        assert_eq!(kind, ErrorKind::Unauthorized);
    }
}
