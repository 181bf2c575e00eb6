//! Session Context
//!
//! Entry point of the session subsystem. Wires the token store, hub,
//! refresh coordinator and request client together, and exposes the
//! session operations: startup, login, sign-in, registration, logout.

use std::sync::Arc;

use platform::bridge::{CompanionBridge, CompanionMessage};
use platform::secret::ClearTextPassword;
use platform::transport::HttpTransport;
use tokio::sync::{OnceCell, broadcast, watch};

use crate::application::config::SessionConfig;
use crate::application::hub::{SessionEvent, SessionHub, SessionState};
use crate::application::refresh::RefreshCoordinator;
use crate::application::request_client::RequestClient;
use crate::application::token_store::TokenStore;
use crate::domain::entity::identity::UserIdentity;
use crate::domain::repository::SessionPersistence;
use crate::domain::value_object::credential::{AccessToken, RefreshToken};
use crate::domain::value_object::session_status::EndReason;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{SessionError, SessionResult};
use crate::infra::auth_api::AuthApi;
use crate::infra::payload::{AuthGrant, LoginBody, RegisterBody, RegisterUser};

/// Registration input
pub struct RegisterInput {
    pub organization_name: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct SessionContext<T, P> {
    hub: Arc<SessionHub<P>>,
    coordinator: Arc<RefreshCoordinator<T, P>>,
    client: RequestClient<T, P>,
    auth: AuthApi<T>,
    bridge: Arc<dyn CompanionBridge>,
    startup: OnceCell<()>,
}

impl<T, P> SessionContext<T, P>
where
    T: HttpTransport + Send + Sync + 'static,
    P: SessionPersistence + Send + Sync + 'static,
{
    pub fn new(
        transport: Arc<T>,
        persistence: P,
        config: SessionConfig,
        bridge: Arc<dyn CompanionBridge>,
    ) -> Self {
        let config = Arc::new(config);
        let tokens = Arc::new(TokenStore::new());
        let hub = Arc::new(SessionHub::new(persistence, Arc::clone(&tokens)));
        let auth = AuthApi::new(Arc::clone(&transport), Arc::clone(&config));
        let coordinator = Arc::new(RefreshCoordinator::new(Arc::clone(&hub), auth.clone()));
        let client = RequestClient::new(transport, tokens, Arc::clone(&coordinator), config);

        Self {
            hub,
            coordinator,
            client,
            auth,
            bridge,
            startup: OnceCell::new(),
        }
    }

    /// Run startup once and wait for it to settle
    ///
    /// With a stored refresh credential this performs exactly one refresh;
    /// without one the session goes straight to `Unauthenticated`. Never
    /// fails: a failed startup refresh just ends unauthenticated.
    pub async fn start(&self) -> SessionState {
        self.startup
            .get_or_init(|| async {
                if self.hub.begin_startup().await {
                    match self.coordinator.refresh_after(None).await {
                        Ok(_) => tracing::info!("Startup refresh succeeded"),
                        Err(failure) => {
                            tracing::info!(error = %failure, "Startup refresh failed, signed out")
                        }
                    }
                }
            })
            .await;
        self.hub.snapshot()
    }

    /// Wait until startup has settled (without starting it)
    pub async fn wait_until_settled(&self) -> SessionState {
        let mut receiver = self.hub.subscribe();
        match receiver.wait_for(|state| state.status.is_settled()).await {
            Ok(state) => state.clone(),
            Err(_) => self.hub.snapshot(),
        }
    }

    /// Store a session obtained elsewhere
    pub async fn login(
        &self,
        identity: UserIdentity,
        access: AccessToken,
        refresh: RefreshToken,
        organization: Option<String>,
    ) -> SessionResult<SessionState> {
        self.start().await;
        self.hub
            .establish(identity.clone(), access.clone(), refresh, organization.clone())
            .await?;
        self.announce(&identity, &access, organization);
        Ok(self.hub.snapshot())
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: String) -> SessionResult<SessionState> {
        let password = ClearTextPassword::new(password)?;
        let grant = self
            .auth
            .login(&LoginBody {
                email: email.trim(),
                password: &password,
            })
            .await
            .inspect_err(SessionError::log)?;
        drop(password);
        self.adopt(grant).await
    }

    /// Create an organization and its owning admin, then sign in as them
    pub async fn register(&self, input: RegisterInput) -> SessionResult<SessionState> {
        let password = ClearTextPassword::for_registration(input.password)?;
        let body = RegisterBody {
            organization_name: input.organization_name.trim(),
            user: RegisterUser {
                name: input.name.trim(),
                email: input.email.trim(),
                password: &password,
                role: UserRole::Admin,
                is_owner: true,
            },
        };
        let grant = self
            .auth
            .register(&body)
            .await
            .inspect_err(SessionError::log)?;
        drop(password);

        // Older backends omit the organization in the register response
        let grant = AuthGrant {
            organization: grant
                .organization
                .or_else(|| Some(input.organization_name.trim().to_string())),
            ..grant
        };
        self.adopt(grant).await
    }

    /// End the session (memory and durable storage)
    pub async fn logout(&self) -> SessionResult<()> {
        let result = self.hub.terminate(EndReason::LoggedOut).await;
        self.bridge.announce(CompanionMessage::SessionEnded);
        result
    }

    /// Client for authenticated API calls
    pub fn request_client(&self) -> RequestClient<T, P> {
        self.client.clone()
    }

    pub fn state(&self) -> SessionState {
        self.hub.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.hub.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.hub.events()
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        self.hub.tokens()
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator<T, P>> {
        &self.coordinator
    }

    async fn adopt(&self, grant: AuthGrant) -> SessionResult<SessionState> {
        let identity = grant.identity.ok_or_else(|| {
            SessionError::MalformedGrant("response carries no user record".to_string())
        })?;
        let refresh = grant.refresh.ok_or_else(|| {
            SessionError::MalformedGrant("response carries no refresh token".to_string())
        })?;
        self.login(identity, grant.access, refresh, grant.organization)
            .await
    }

    fn announce(&self, identity: &UserIdentity, access: &AccessToken, organization: Option<String>) {
        self.bridge.announce(CompanionMessage::SessionStarted {
            user_id: identity.id.to_string(),
            name: identity.display_name().to_string(),
            email: identity.email.clone(),
            role: identity.role.code().to_string(),
            organization,
            access_token: access.as_secret().clone(),
        });
    }
}
