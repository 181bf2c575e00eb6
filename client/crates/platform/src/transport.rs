//! HTTP Transport
//!
//! Raw request/response exchange with the REST backend. The transport
//! attaches what it is given and reports what came back; it never decides
//! what a status code means. That policy lives in the session crate.

use std::time::Duration;

use http::Method;
use kernel::error::app_error::AppError;
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::secret::SecretString;

/// Outgoing request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<SecretString>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_bearer(mut self, token: Option<SecretString>) -> Self {
        self.bearer = token;
        self
    }
}

/// Response as received
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Parsed JSON body; `None` for an empty body. A non-JSON error body is
    /// kept as a JSON string.
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures (no usable HTTP response)
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Could not connect to backend: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Backend returned a non-JSON body with status {status}")]
    InvalidBody { status: u16 },
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match &err {
            TransportError::InvalidBody { .. } => AppError::decode(err.to_string()).with_source(err),
            TransportError::Connect(_) => AppError::transport(err.to_string())
                .with_action("Check WORKPULSE_API_URL and that the backend is reachable")
                .with_source(err),
            TransportError::Timeout | TransportError::Request(_) => {
                AppError::transport(err.to_string()).with_source(err)
            }
        }
    }
}

/// Trait for HTTP backends
#[trait_variant::make(HttpTransport: Send)]
pub trait LocalHttpTransport {
    /// Execute one request without retries
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10).min(config.request_timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url(&request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(http::header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose());
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(classify)?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status,
            bytes = bytes.len(),
            "Backend responded"
        );

        let body = decode_body(status, &bytes)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

/// Decode a response body
///
/// Success bodies must be JSON (or empty). Error bodies may be anything;
/// non-JSON text is preserved as a string so the caller still sees it.
fn decode_body(status: u16, bytes: &[u8]) -> Result<Option<Value>, TransportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => Ok(Some(value)),
        Err(_) if (200..300).contains(&status) => Err(TransportError::InvalidBody { status }),
        Err(_) => Ok(Some(Value::String(
            String::from_utf8_lossy(bytes).trim().to_string(),
        ))),
    }
}
