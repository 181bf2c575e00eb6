//! Request Client
//!
//! Every authenticated API call goes through here:
//!
//! - attach `Authorization: Bearer <access>` when a credential is present
//! - 2xx: return the JSON body (`null` for an empty body)
//! - 401 from an auth endpoint: return it, no refresh
//! - 401 elsewhere: refresh once, then re-issue the call once with the new
//!   credential; when the refresh fails the original 401 is returned
//! - anything else: returned unchanged, with the backend's error payload

use std::sync::Arc;

use http::Method;
use kernel::error::app_error::{AppError, AppResult};
use platform::transport::{HttpRequest, HttpTransport};
use serde_json::Value;

use crate::application::config::SessionConfig;
use crate::application::refresh::RefreshCoordinator;
use crate::application::token_store::TokenStore;
use crate::domain::repository::SessionPersistence;
use crate::domain::value_object::credential::AccessToken;

const UNAUTHORIZED: u16 = 401;

/// API call as seen by feature code
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query<K, V>(mut self, query: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(query.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    fn to_http(&self, bearer: Option<&AccessToken>) -> HttpRequest {
        let mut request = HttpRequest::new(self.method.clone(), self.path.clone())
            .with_query(self.query.clone())
            .with_bearer(bearer.map(|t| t.as_secret().clone()));
        if let Some(body) = &self.body {
            request = request.with_json(body.clone());
        }
        request
    }
}

/// Trait for sending authenticated API calls
#[trait_variant::make(ApiClient: Send)]
pub trait LocalApiClient {
    /// Send one call, refreshing and retrying at most once on 401
    async fn send(&self, request: ApiRequest) -> AppResult<Value>;
}

pub struct RequestClient<T, P> {
    transport: Arc<T>,
    tokens: Arc<TokenStore>,
    coordinator: Arc<RefreshCoordinator<T, P>>,
    config: Arc<SessionConfig>,
}

impl<T, P> Clone for RequestClient<T, P> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            tokens: Arc::clone(&self.tokens),
            coordinator: Arc::clone(&self.coordinator),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T, P> RequestClient<T, P>
where
    T: HttpTransport + Send + Sync + 'static,
    P: SessionPersistence + Send + Sync + 'static,
{
    pub fn new(
        transport: Arc<T>,
        tokens: Arc<TokenStore>,
        coordinator: Arc<RefreshCoordinator<T, P>>,
        config: Arc<SessionConfig>,
    ) -> Self {
        Self {
            transport,
            tokens,
            coordinator,
            config,
        }
    }
}

impl<T, P> ApiClient for RequestClient<T, P>
where
    T: HttpTransport + Send + Sync + 'static,
    P: SessionPersistence + Send + Sync + 'static,
{
    async fn send(&self, request: ApiRequest) -> AppResult<Value> {
        let mut bearer = self.tokens.current();
        // Set once, never reset: a call is retried at most one time
        let mut retried = false;

        loop {
            let response = self.transport.execute(request.to_http(bearer.as_ref())).await?;
            if response.is_success() {
                return Ok(response.body.unwrap_or(Value::Null));
            }

            let status = response.status;
            let error = AppError::from_response(status, response.body);
            if status != UNAUTHORIZED || retried || self.config.is_auth_endpoint(&request.path) {
                tracing::debug!(
                    method = %request.method,
                    path = %request.path,
                    status,
                    retried,
                    "API call failed"
                );
                return Err(error);
            }

            tracing::debug!(path = %request.path, "Access credential rejected, refreshing");
            match self.coordinator.refresh_after(bearer.as_ref()).await {
                Ok(token) => {
                    bearer = Some(token);
                    retried = true;
                }
                Err(failure) => {
                    tracing::warn!(path = %request.path, error = %failure, "Refresh failed, returning original 401");
                    return Err(error);
                }
            }
        }
    }
}
