//! Repository Traits
//!
//! Interface for durable session storage. Implementation is in the
//! infrastructure layer.

use crate::domain::entity::identity::UserIdentity;
use crate::domain::value_object::credential::RefreshToken;
use crate::error::SessionResult;

/// Durable part of a session
///
/// There is no access credential here on purpose: it never leaves memory.
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub refresh: RefreshToken,
    pub identity: Option<UserIdentity>,
    pub organization: Option<String>,
}

/// Session persistence trait
#[trait_variant::make(SessionPersistence: Send)]
pub trait LocalSessionPersistence {
    /// Load the stored session, if a refresh credential is present
    async fn load(&self) -> SessionResult<Option<StoredSession>>;

    /// Store the session, replacing whatever was there
    async fn save(&self, session: &StoredSession) -> SessionResult<()>;

    /// Remove every stored key in one step
    async fn clear(&self) -> SessionResult<()>;
}
