//! User Identity Entity
//!
//! Who is signed in, as reported by the backend. Persisted alongside the
//! refresh credential so a restarted client knows the user before the
//! startup refresh completes.

use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::user_role::UserRole;

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub functional_unit: Option<String>,
    #[serde(default)]
    pub manager_id: Option<UserId>,
}

impl UserIdentity {
    /// Display name, falling back to the email address
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.email.as_deref().unwrap_or("unknown")
        } else {
            &self.name
        }
    }
}
