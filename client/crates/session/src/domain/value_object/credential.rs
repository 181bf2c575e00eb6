//! Session Credentials
//!
//! Two bearer secrets make up a session:
//! - [`AccessToken`]: short-lived, attached to every API call, memory only
//! - [`RefreshToken`]: long-lived, exchanged for new access tokens, the only
//!   secret that is ever written to durable storage

use platform::secret::SecretString;

/// Short-lived access credential
///
/// Deliberately has no `Serialize` impl so it cannot end up in the durable
/// session document by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::new(value))
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    pub fn as_secret(&self) -> &SecretString {
        &self.0
    }

    /// Log-safe fingerprint
    pub fn fingerprint(&self) -> String {
        self.0.fingerprint()
    }
}

/// Long-lived refresh credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken(SecretString);

impl RefreshToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::new(value))
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    /// Log-safe fingerprint
    pub fn fingerprint(&self) -> String {
        self.0.fingerprint()
    }
}
