//! Session Status
//!
//! Lifecycle of the session owner:
//!
//! ```text
//! Uninitialized ──(stored refresh credential)──> Refreshing ──> Authenticated
//!       │                                            └────────> Unauthenticated
//!       └──────────(nothing stored)─────────────────────────> Unauthenticated
//!
//! Unauthenticated ──login──> Authenticated ──logout / failed refresh──> Unauthenticated
//! Authenticated ──background refresh──> Authenticated
//! ```

use derive_more::Display;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Startup has not run yet
    #[default]
    #[display("uninitialized")]
    Uninitialized,
    /// Startup refresh in progress; protected content must wait
    #[display("refreshing")]
    Refreshing,
    #[display("authenticated")]
    Authenticated,
    #[display("unauthenticated")]
    Unauthenticated,
}

/// Why a session is (or became) unauthenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Nothing was stored at startup
    #[display("no stored session")]
    NoStoredSession,
    /// Explicit logout
    #[display("logged out")]
    LoggedOut,
    /// The refresh credential was rejected or missing
    #[display("refresh failed")]
    RefreshFailed,
}

impl SessionStatus {
    /// Whether the state machine allows `self -> next`
    pub const fn can_transition_to(&self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Uninitialized, Refreshing)
                | (Uninitialized, Unauthenticated)
                | (Refreshing, Authenticated)
                | (Refreshing, Unauthenticated)
                | (Authenticated, Authenticated)
                | (Authenticated, Unauthenticated)
                | (Unauthenticated, Authenticated)
                | (Unauthenticated, Unauthenticated)
        )
    }

    /// Startup has settled; protected content may render
    #[inline]
    pub const fn is_settled(&self) -> bool {
        matches!(
            self,
            SessionStatus::Authenticated | SessionStatus::Unauthenticated
        )
    }

    #[inline]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionStatus::*;

    #[test]
    fn test_startup_transitions() {
        assert!(Uninitialized.can_transition_to(Refreshing));
        assert!(Uninitialized.can_transition_to(Unauthenticated));
        assert!(!Uninitialized.can_transition_to(Authenticated));
        assert!(Refreshing.can_transition_to(Authenticated));
        assert!(Refreshing.can_transition_to(Unauthenticated));
        assert!(!Refreshing.can_transition_to(Refreshing));
    }

    #[test]
    fn test_steady_state_transitions() {
        assert!(Authenticated.can_transition_to(Authenticated));
        assert!(Authenticated.can_transition_to(Unauthenticated));
        assert!(Unauthenticated.can_transition_to(Authenticated));
        assert!(!Authenticated.can_transition_to(Refreshing));
        assert!(!Unauthenticated.can_transition_to(Uninitialized));
    }

    #[test]
    fn test_is_settled() {
        assert!(!Uninitialized.is_settled());
        assert!(!Refreshing.is_settled());
        assert!(Authenticated.is_settled());
        assert!(Unauthenticated.is_settled());
    }

    #[test]
    fn test_display() {
        assert_eq!(Refreshing.to_string(), "refreshing");
        assert_eq!(EndReason::RefreshFailed.to_string(), "refresh failed");
    }
}
