//! Domain Layer
//!
//! Session entities, value objects, and the persistence trait.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{identity::UserIdentity, session::Session};
pub use repository::{SessionPersistence, StoredSession};
pub use value_object::{
    credential::{AccessToken, RefreshToken},
    session_status::{EndReason, SessionStatus},
    user_role::UserRole,
};
