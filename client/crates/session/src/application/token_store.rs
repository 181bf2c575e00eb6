//! Token Store
//!
//! Holder of the current access credential. One instance per session; the
//! request client reads it for every outgoing call. Only the session hub
//! writes it (login, refresh settle, logout).

use std::sync::RwLock;

use crate::domain::value_object::credential::AccessToken;

#[derive(Debug, Default)]
pub struct TokenStore {
    access: RwLock<Option<AccessToken>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current access credential, if any
    pub fn current(&self) -> Option<AccessToken> {
        match self.access.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn replace(&self, token: AccessToken) {
        tracing::trace!(access = %token.fingerprint(), "Access credential replaced");
        self.write(Some(token));
    }

    pub(crate) fn clear(&self) {
        self.write(None);
    }

    // A poisoned lock still holds a valid Option; keep using it
    fn write(&self, value: Option<AccessToken>) {
        match self.access.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_and_clear() {
        let store = TokenStore::new();
        assert!(store.current().is_none());

        store.replace(AccessToken::new("a1"));
        assert_eq!(store.current(), Some(AccessToken::new("a1")));

        store.replace(AccessToken::new("a2"));
        assert_eq!(store.current(), Some(AccessToken::new("a2")));

        store.clear();
        assert!(store.current().is_none());
    }
}
