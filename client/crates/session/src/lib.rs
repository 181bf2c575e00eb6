//! Session Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session entity, credentials, status, persistence trait
//! - `application/` - Token store, session hub, refresh coordinator,
//!   request client, session context
//! - `infra/` - Auth endpoint calls, durable session storage
//!
//! ## Session Model
//! - The access credential lives in memory only (`TokenStore`)
//! - The refresh credential, user record and organization label are the
//!   only durable session material; logout removes all of them at once
//! - A 401 on an authenticated call triggers at most one refresh per call;
//!   concurrent 401s share a single refresh exchange
//! - A failed refresh ends the session and emits `SessionEvent::LoginRequired`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::{
    ApiClient, ApiRequest, LocalApiClient, RegisterInput, RequestClient, SessionConfig,
    SessionContext, SessionEvent, SessionState, TokenStore,
};
pub use domain::{
    AccessToken, EndReason, RefreshToken, SessionStatus, UserIdentity, UserRole,
};
pub use error::{RefreshFailure, SessionError, SessionResult};
pub use infra::DurableSessionStore;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
