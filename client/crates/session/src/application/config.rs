//! Application Configuration
//!
//! Configuration for the session application layer.

/// Session application configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Login endpoint (POST `{ email, password }`)
    pub login_path: String,
    /// Registration endpoint (POST `{ organization_name, user }`)
    pub register_path: String,
    /// Refresh endpoint (POST `{ refresh_token }`)
    pub refresh_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: "/auth/login".to_string(),
            register_path: "/auth/register".to_string(),
            refresh_path: "/auth/refresh".to_string(),
        }
    }
}

impl SessionConfig {
    /// Endpoints whose 401 is a credential problem, not an expired token
    ///
    /// A 401 from any of these is surfaced directly; it never triggers a
    /// refresh.
    pub fn is_auth_endpoint(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or(path).trim_end_matches('/');
        [&self.login_path, &self.register_path, &self.refresh_path]
            .iter()
            .any(|p| p.trim_end_matches('/') == path)
    }
}
