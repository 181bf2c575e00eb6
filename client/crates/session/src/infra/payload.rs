//! Authentication Payloads
//!
//! Request bodies for the auth endpoints and normalization of what comes
//! back. The backend is not consistent about response shapes, so a grant
//! is read leniently:
//!
//! | field        | accepted keys                                   |
//! |--------------|-------------------------------------------------|
//! | user         | `user`, or the payload itself when it has `id`  |
//! | role         | `user.role`, then `role`                        |
//! | access       | `access_token`, `accessToken`, `token`          |
//! | refresh      | `refresh_token`, `refreshToken`                 |
//! | organization | `organization_name`, `organization.name`        |

use serde::Serialize;
use serde_json::{Map, Value};

use platform::secret::ClearTextPassword;

use crate::domain::entity::identity::UserIdentity;
use crate::domain::value_object::credential::{AccessToken, RefreshToken};
use crate::domain::value_object::user_role::UserRole;
use crate::error::{SessionError, SessionResult};

const ACCESS_KEYS: [&str; 3] = ["access_token", "accessToken", "token"];
const REFRESH_KEYS: [&str; 2] = ["refresh_token", "refreshToken"];

/// `POST /auth/login` body
#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a ClearTextPassword,
}

/// `POST /auth/register` body
#[derive(Debug, Serialize)]
pub struct RegisterBody<'a> {
    pub organization_name: &'a str,
    pub user: RegisterUser<'a>,
}

/// The account created with a new organization (always its owning admin)
#[derive(Debug, Serialize)]
pub struct RegisterUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a ClearTextPassword,
    pub role: UserRole,
    pub is_owner: bool,
}

/// `POST /auth/refresh` body
#[derive(Debug, Serialize)]
pub struct RefreshBody<'a> {
    pub refresh_token: &'a str,
}

/// Normalized login/register/refresh response
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub identity: Option<UserIdentity>,
    pub access: AccessToken,
    /// Present on login/register; on refresh only when the backend rotates it
    pub refresh: Option<RefreshToken>,
    pub organization: Option<String>,
}

impl AuthGrant {
    /// Normalize a login or register response; both credentials required
    pub fn from_login_payload(payload: Option<Value>) -> SessionResult<Self> {
        let grant = Self::normalize(payload)?;
        if grant.refresh.is_none() {
            return Err(SessionError::MalformedGrant(
                "response carries no refresh token".to_string(),
            ));
        }
        Ok(grant)
    }

    /// Normalize a refresh response; the refresh token is optional
    pub fn from_refresh_payload(payload: Option<Value>) -> SessionResult<Self> {
        Self::normalize(payload)
    }

    fn normalize(payload: Option<Value>) -> SessionResult<Self> {
        let Some(Value::Object(object)) = payload else {
            return Err(SessionError::MalformedGrant(
                "response is not a JSON object".to_string(),
            ));
        };

        let access = first_string(&object, &ACCESS_KEYS)
            .map(AccessToken::new)
            .ok_or_else(|| {
                SessionError::MalformedGrant("response carries no access token".to_string())
            })?;
        let refresh = first_string(&object, &REFRESH_KEYS).map(RefreshToken::new);
        let organization = organization(&object);
        let identity = identity(&object)?;

        Ok(Self {
            identity,
            access,
            refresh,
            organization,
        })
    }
}

fn first_string(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn organization(object: &Map<String, Value>) -> Option<String> {
    if let Some(name) = object.get("organization_name").and_then(Value::as_str) {
        return Some(name.to_string());
    }
    object
        .get("organization")
        .and_then(|org| org.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn identity(object: &Map<String, Value>) -> SessionResult<Option<UserIdentity>> {
    let mut user = match object.get("user") {
        Some(Value::Object(user)) => user.clone(),
        Some(Value::Null) | None if object.contains_key("id") => object.clone(),
        _ => return Ok(None),
    };

    if !user.contains_key("role") {
        if let Some(role) = object.get("role") {
            user.insert("role".to_string(), role.clone());
        }
    }

    serde_json::from_value(Value::Object(user))
        .map(Some)
        .map_err(|e| SessionError::MalformedGrant(format!("user record: {e}")))
}
