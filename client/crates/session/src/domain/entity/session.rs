//! Session Entity
//!
//! The signed-in session as held by the session hub. The access credential
//! is not part of this record: it lives in the token store, in memory only.

use chrono::{DateTime, Utc};

use crate::domain::entity::identity::UserIdentity;
use crate::domain::repository::StoredSession;
use crate::domain::value_object::credential::RefreshToken;

/// Signed-in session
#[derive(Debug, Clone)]
pub struct Session {
    /// Signed-in user (unknown after a startup refresh that did not return one)
    pub identity: Option<UserIdentity>,
    /// Organization label shown alongside the user
    pub organization: Option<String>,
    /// Durable refresh credential
    pub refresh: RefreshToken,
    /// When this session was created (login, register, or startup restore)
    pub established_at: DateTime<Utc>,
    /// Last successful refresh
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(
        identity: Option<UserIdentity>,
        organization: Option<String>,
        refresh: RefreshToken,
    ) -> Self {
        Self {
            identity,
            organization,
            refresh,
            established_at: Utc::now(),
            refreshed_at: None,
        }
    }

    /// Restore from durable storage
    pub fn restore(stored: StoredSession) -> Self {
        Self::new(stored.identity, stored.organization, stored.refresh)
    }

    /// The part of the session that is written to durable storage
    pub fn to_stored(&self) -> StoredSession {
        StoredSession {
            refresh: self.refresh.clone(),
            identity: self.identity.clone(),
            organization: self.organization.clone(),
        }
    }

    /// Record a successful refresh
    pub fn touch_refreshed(&mut self) {
        self.refreshed_at = Some(Utc::now());
    }
}
