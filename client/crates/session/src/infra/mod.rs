//! Infrastructure Layer
//!
//! Auth endpoint calls and durable session storage.

pub mod auth_api;
pub mod durable;
pub mod payload;

pub use auth_api::AuthApi;
pub use durable::DurableSessionStore;
pub use payload::AuthGrant;
