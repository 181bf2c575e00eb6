//! Application Layer
//!
//! Session services: token store, session hub, refresh coordination and
//! the authenticated request client.

pub mod config;
pub mod context;
pub mod hub;
pub mod refresh;
pub mod request_client;
pub mod token_store;

// Re-exports
pub use config::SessionConfig;
pub use context::{RegisterInput, SessionContext};
pub use hub::{SessionEvent, SessionHub, SessionState};
pub use refresh::{RefreshCoordinator, RefreshOutcome};
pub use request_client::{ApiClient, ApiRequest, LocalApiClient, RequestClient};
pub use token_store::TokenStore;
