//! Auth Endpoint Client
//!
//! Raw calls to the login, register and refresh endpoints. None of these
//! go through the request client: a 401 here is an answer, not an expired
//! access credential.

use std::sync::Arc;

use http::Method;
use kernel::error::app_error::AppError;
use platform::transport::{HttpRequest, HttpTransport};
use serde::Serialize;

use crate::application::config::SessionConfig;
use crate::domain::value_object::credential::RefreshToken;
use crate::error::{SessionError, SessionResult};
use crate::infra::payload::{AuthGrant, LoginBody, RefreshBody, RegisterBody};

pub struct AuthApi<T> {
    transport: Arc<T>,
    config: Arc<SessionConfig>,
}

impl<T> Clone for AuthApi<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T: HttpTransport> AuthApi<T> {
    pub fn new(transport: Arc<T>, config: Arc<SessionConfig>) -> Self {
        Self { transport, config }
    }

    pub async fn login(&self, body: &LoginBody<'_>) -> SessionResult<AuthGrant> {
        let payload = self.post(&self.config.login_path, body).await?;
        AuthGrant::from_login_payload(payload)
    }

    pub async fn register(&self, body: &RegisterBody<'_>) -> SessionResult<AuthGrant> {
        let payload = self.post(&self.config.register_path, body).await?;
        AuthGrant::from_login_payload(payload)
    }

    pub async fn refresh(&self, refresh: &RefreshToken) -> SessionResult<AuthGrant> {
        let body = RefreshBody {
            refresh_token: refresh.expose(),
        };
        let payload = self.post(&self.config.refresh_path, &body).await?;
        AuthGrant::from_refresh_payload(payload)
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> SessionResult<Option<serde_json::Value>> {
        let json = serde_json::to_value(body)
            .map_err(|e| SessionError::Api(AppError::internal("Could not encode request").with_source(e)))?;
        let request = HttpRequest::new(Method::POST, path).with_json(json);

        let response = self.transport.execute(request).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            tracing::debug!(path = %path, status = response.status, "Auth endpoint rejected request");
            Err(SessionError::Api(AppError::from_response(
                response.status,
                response.body,
            )))
        }
    }
}
