//! Session Hub
//!
//! Single authoritative owner of the session. Everything that changes the
//! session goes through here, in one order:
//!
//! 1. durable storage
//! 2. token store
//! 3. published [`SessionState`] (a `watch` channel consumers subscribe to)
//! 4. a [`SessionEvent`] on the broadcast channel
//!
//! Mutations are serialized by an async mutex, so a refresh that settles
//! after a logout (or a new login) can tell its result is stale.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, broadcast, watch};

use crate::application::token_store::TokenStore;
use crate::domain::entity::identity::UserIdentity;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionPersistence;
use crate::domain::value_object::credential::{AccessToken, RefreshToken};
use crate::domain::value_object::session_status::{EndReason, SessionStatus};
use crate::error::{RefreshFailure, SessionError, SessionResult};
use crate::infra::payload::AuthGrant;

const EVENT_CAPACITY: usize = 16;

/// Published view of the session
///
/// Carries no credentials; safe to log or print.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub status: SessionStatus,
    pub identity: Option<UserIdentity>,
    pub organization: Option<String>,
    pub ended_by: Option<EndReason>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Session notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    Refreshed,
    LoggedOut,
    /// The session ended because it could not be refreshed; the user has
    /// to sign in again
    LoginRequired,
}

pub struct SessionHub<P> {
    persistence: P,
    tokens: Arc<TokenStore>,
    session: Mutex<Option<Session>>,
    state: watch::Sender<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl<P: SessionPersistence> SessionHub<P> {
    pub fn new(persistence: P, tokens: Arc<TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            persistence,
            tokens,
            session: Mutex::new(None),
            state: watch::Sender::new(SessionState::default()),
            events,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Current published state
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Follow state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Follow session events
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Refresh credential of the live session
    pub async fn refresh_credential(&self) -> Option<RefreshToken> {
        self.session.lock().await.as_ref().map(|s| s.refresh.clone())
    }

    /// Load the stored session and leave `Uninitialized`
    ///
    /// Returns `true` when a refresh credential was found; the hub is then
    /// `Refreshing` and the caller must run exactly one refresh.
    pub(crate) async fn begin_startup(&self) -> bool {
        let mut session = self.session.lock().await;
        if self.state.borrow().status != SessionStatus::Uninitialized {
            return false;
        }

        let stored = match self.persistence.load().await {
            Ok(stored) => stored,
            Err(e) => {
                e.log();
                None
            }
        };

        match stored {
            Some(stored) => {
                let restored = Session::restore(stored);
                tracing::info!(
                    refresh = %restored.refresh.fingerprint(),
                    "Stored session found, refreshing"
                );
                let identity = restored.identity.clone();
                let organization = restored.organization.clone();
                *session = Some(restored);
                self.publish(SessionStatus::Refreshing, |state| {
                    state.identity = identity;
                    state.organization = organization;
                })
                .is_ok()
            }
            None => {
                tracing::info!("No stored session");
                if let Err(e) = self.publish(SessionStatus::Unauthenticated, |state| {
                    state.ended_by = Some(EndReason::NoStoredSession);
                }) {
                    e.log();
                }
                false
            }
        }
    }

    /// Start a session from a login or registration
    pub(crate) async fn establish(
        &self,
        identity: UserIdentity,
        access: AccessToken,
        refresh: RefreshToken,
        organization: Option<String>,
    ) -> SessionResult<()> {
        let mut session = self.session.lock().await;
        let status = self.state.borrow().status;
        if !status.can_transition_to(SessionStatus::Authenticated) {
            return Err(SessionError::InvalidTransition {
                from: status,
                to: SessionStatus::Authenticated,
            });
        }

        let next = Session::new(Some(identity.clone()), organization.clone(), refresh);
        self.persistence.save(&next.to_stored()).await?;
        self.tokens.replace(access);

        tracing::info!(
            user_id = %identity.id,
            role = %identity.role,
            refresh = %next.refresh.fingerprint(),
            "Session established"
        );

        *session = Some(next);
        self.publish(SessionStatus::Authenticated, |state| {
            state.identity = Some(identity);
            state.organization = organization;
            state.ended_by = None;
            state.refreshed_at = None;
        })?;
        self.emit(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Apply a successful refresh exchange made with `used`
    pub(crate) async fn apply_refresh(
        &self,
        used: &RefreshToken,
        grant: AuthGrant,
    ) -> Result<AccessToken, RefreshFailure> {
        let mut guard = self.session.lock().await;
        let Some(session) = guard.as_mut().filter(|s| &s.refresh == used) else {
            tracing::debug!("Discarding refresh result for a session that no longer exists");
            return Err(RefreshFailure::superseded());
        };

        let rotated = grant.refresh.is_some();
        let identity_changed = grant
            .identity
            .as_ref()
            .is_some_and(|identity| session.identity.as_ref() != Some(identity));
        if let Some(refresh) = grant.refresh {
            session.refresh = refresh;
        }
        if let Some(identity) = grant.identity {
            session.identity = Some(identity);
        }
        if grant.organization.is_some() {
            session.organization = grant.organization;
        }
        session.touch_refreshed();

        if rotated || identity_changed {
            // The exchange already succeeded; the in-memory session stays
            // usable even if the durable copy could not be updated.
            if let Err(e) = self.persistence.save(&session.to_stored()).await {
                e.log();
            }
        }

        self.tokens.replace(grant.access.clone());
        tracing::info!(
            access = %grant.access.fingerprint(),
            rotated = rotated,
            "Session refreshed"
        );

        let identity = session.identity.clone();
        let organization = session.organization.clone();
        let refreshed_at = session.refreshed_at;
        self.publish(SessionStatus::Authenticated, |state| {
            state.identity = identity;
            state.organization = organization;
            state.ended_by = None;
            state.refreshed_at = refreshed_at;
        })
        .map_err(|e| RefreshFailure::from(&e))?;
        self.emit(SessionEvent::Refreshed);
        Ok(grant.access)
    }

    /// End the session after a failed exchange made with `used`
    ///
    /// A failure for a session that has since ended or been replaced is
    /// ignored. Without a credential, nothing ends before startup has loaded
    /// storage.
    pub(crate) async fn fail_refresh(&self, used: Option<&RefreshToken>) {
        let mut session = self.session.lock().await;
        match used {
            Some(used) if session.as_ref().is_none_or(|current| &current.refresh != used) => {
                tracing::debug!("Ignoring refresh failure for an ended or replaced session");
                return;
            }
            None if self.state.borrow().status == SessionStatus::Uninitialized => {
                tracing::debug!("Refresh failed before startup, stored session left untouched");
                return;
            }
            _ => {}
        }
        if let Err(e) = self.end(&mut session, EndReason::RefreshFailed).await {
            e.log();
        }
    }

    /// End the session for `reason`
    ///
    /// Memory is always cleared; a durable storage failure is reported
    /// afterwards.
    pub(crate) async fn terminate(&self, reason: EndReason) -> SessionResult<()> {
        let mut session = self.session.lock().await;
        self.end(&mut session, reason).await
    }

    async fn end(&self, session: &mut Option<Session>, reason: EndReason) -> SessionResult<()> {
        let cleared = self.persistence.clear().await;
        self.tokens.clear();
        let previous = session.take();

        tracing::info!(
            reason = %reason,
            had_session = previous.is_some(),
            "Session ended"
        );

        self.publish(SessionStatus::Unauthenticated, |state| {
            state.identity = None;
            state.organization = None;
            state.refreshed_at = None;
            state.ended_by = Some(reason);
        })?;

        match reason {
            EndReason::LoggedOut => self.emit(SessionEvent::LoggedOut),
            EndReason::RefreshFailed => self.emit(SessionEvent::LoginRequired),
            EndReason::NoStoredSession => {}
        }
        cleared
    }

    fn publish(
        &self,
        next: SessionStatus,
        update: impl FnOnce(&mut SessionState),
    ) -> SessionResult<()> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| {
            if !state.status.can_transition_to(next) {
                result = Err(SessionError::InvalidTransition {
                    from: state.status,
                    to: next,
                });
                return false;
            }
            state.status = next;
            update(state);
            true
        });
        result
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
