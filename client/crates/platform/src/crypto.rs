//! Cryptographic Utilities
//!
//! Credentials never appear in logs. Anything that needs to correlate a
//! token across log lines uses [`fingerprint`] instead.

use base64::{Engine, engine::general_purpose};
use sha2::{Digest, Sha256};

/// Number of digest bytes kept in a fingerprint
const FINGERPRINT_BYTES: usize = 9;

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as URL-safe base64 without padding
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Short, non-reversible identifier of a secret, safe to log
///
/// Two fingerprints are equal iff the secrets are (up to the usual
/// truncated-hash collision odds), which is all log correlation needs.
pub fn fingerprint(secret: &str) -> String {
    let digest = sha256(secret.as_bytes());
    to_base64_url(&digest[..FINGERPRINT_BYTES])
}
