//! Durable Session Store
//!
//! Maps a [`StoredSession`] onto three keys of a [`KeyValueStore`]. The
//! access credential has no key.

use platform::storage::KeyValueStore;

use crate::domain::entity::identity::UserIdentity;
use crate::domain::repository::{SessionPersistence, StoredSession};
use crate::domain::value_object::credential::RefreshToken;
use crate::error::{SessionError, SessionResult};

pub const REFRESH_KEY: &str = "workpulse_refresh_token";
pub const USER_KEY: &str = "workpulse_user";
pub const ORGANIZATION_KEY: &str = "workpulse_organization";

const ALL_KEYS: [&str; 3] = [REFRESH_KEY, USER_KEY, ORGANIZATION_KEY];

/// Key-value backed session persistence
#[derive(Debug)]
pub struct DurableSessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> DurableSessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore + Sync> SessionPersistence for DurableSessionStore<S> {
    async fn load(&self) -> SessionResult<Option<StoredSession>> {
        let Some(refresh) = self
            .store
            .get(REFRESH_KEY)
            .await?
            .filter(|r| !r.trim().is_empty())
        else {
            return Ok(None);
        };

        // A damaged user record only costs us the cached identity; the
        // refresh response can supply it again.
        let identity = match self.store.get(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<UserIdentity>(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unreadable stored user record");
                    None
                }
            },
            None => None,
        };

        let organization = self.store.get(ORGANIZATION_KEY).await?;

        Ok(Some(StoredSession {
            refresh: RefreshToken::new(refresh),
            identity,
            organization,
        }))
    }

    async fn save(&self, session: &StoredSession) -> SessionResult<()> {
        let mut entries = vec![(
            REFRESH_KEY.to_string(),
            session.refresh.expose().to_string(),
        )];
        if let Some(identity) = &session.identity {
            let raw = serde_json::to_string(identity)
                .map_err(|e| SessionError::CorruptStorage(e.to_string()))?;
            entries.push((USER_KEY.to_string(), raw));
        }
        if let Some(organization) = &session.organization {
            entries.push((ORGANIZATION_KEY.to_string(), organization.clone()));
        }

        // Keys the new session does not carry must not survive from the old one
        let stale: Vec<&str> = ALL_KEYS
            .iter()
            .copied()
            .filter(|key| !entries.iter().any(|(k, _)| k == key))
            .collect();

        self.store.set_many(entries).await?;
        if !stale.is_empty() {
            self.store.remove_many(&stale).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> SessionResult<()> {
        self.store.remove_many(&ALL_KEYS).await?;
        Ok(())
    }
}
