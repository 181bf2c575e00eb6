//! Secret Handling
//!
//! Bearer tokens and passwords live in types that:
//! - zeroize their buffer on drop
//! - redact themselves in `Debug` output
//! - only hand out the plaintext through an explicit `expose()` call

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::fingerprint;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length sent to the backend
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Secret string
// ============================================================================

/// Opaque secret string (tokens)
///
/// Cloning is allowed because a refreshed access token is handed to every
/// request that waited on the refresh; each clone is zeroized independently.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Plaintext access
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Log-safe fingerprint of the secret
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.0)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString(<redacted:{}>)", self.fingerprint())
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretString)
    }
}

// ============================================================================
// Clear text password
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains control characters
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; it is moved into the login/register request
/// and dropped right after serialization.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize (NFKC) and validate a password for sign-in
    ///
    /// Sign-in does not enforce a minimum length: accounts created before a
    /// policy change must still be able to log in.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        let password = Self(normalized);
        password.validate_common()?;
        Ok(password)
    }

    /// Normalize and validate a password for registration
    pub fn for_registration(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::new(raw)?;
        let len = password.char_len();
        if len < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: len,
            });
        }
        Ok(password)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    fn validate_common(&self) -> Result<(), PasswordPolicyError> {
        if self.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }
        let len = self.char_len();
        if len > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: len,
            });
        }
        if self.0.chars().any(char::is_control) {
            return Err(PasswordPolicyError::InvalidCharacter);
        }
        Ok(())
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword(<redacted>)")
    }
}

impl Serialize for ClearTextPassword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = SecretString::new("super-secret-token");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_secret_serde_is_transparent() {
        let secret: SecretString = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(secret.expose(), "abc");
        assert_eq!(serde_json::to_string(&secret).unwrap(), "\"abc\"");
    }

    #[test]
    fn test_password_nfkc_normalized() {
        // Full-width letters normalize to ASCII under NFKC
        let password = ClearTextPassword::new("ｐａｓｓｗｏｒｄ".to_string()).unwrap();
        assert_eq!(password.expose(), "password");
    }

    #[test]
    fn test_password_rejects_whitespace() {
        let result = ClearTextPassword::new("   ".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::EmptyOrWhitespace);
    }

    #[test]
    fn test_password_rejects_control_characters() {
        let result = ClearTextPassword::new("pass\u{0007}word".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::InvalidCharacter);
    }

    #[test]
    fn test_password_too_long() {
        let result = ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_sign_in_allows_short_password() {
        assert!(ClearTextPassword::new("short".to_string()).is_ok());
    }

    #[test]
    fn test_registration_requires_minimum_length() {
        let result = ClearTextPassword::for_registration("short".to_string());
        assert_eq!(
            result.unwrap_err(),
            PasswordPolicyError::TooShort { min: 8, actual: 5 }
        );
        assert!(ClearTextPassword::for_registration("long enough".to_string()).is_ok());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = ClearTextPassword::new("hunter2!".to_string()).unwrap();
        assert_eq!(format!("{:?}", password), "ClearTextPassword(<redacted>)");
    }
}
