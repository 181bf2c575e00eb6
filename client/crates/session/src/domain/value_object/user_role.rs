use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    Employee,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Admin => "admin",
            Manager => "manager",
            Employee => "employee",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    #[inline]
    pub const fn is_manager_or_higher(&self) -> bool {
        use UserRole::*;
        matches!(self, Admin | Manager)
    }

    /// Decode a backend role string
    ///
    /// Unknown roles fall back to the least privileged role.
    pub fn from_code(code: &str) -> Self {
        use UserRole::*;
        match code.trim().to_ascii_lowercase().as_str() {
            "admin" => Admin,
            "manager" => Manager,
            "employee" => Employee,
            other => {
                tracing::warn!(role = %other, "Unknown user role, treating as employee");
                Employee
            }
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(UserRole::from_code(&code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("admin"), UserRole::Admin);
        assert_eq!(UserRole::from_code("Manager"), UserRole::Manager);
        assert_eq!(UserRole::from_code(" EMPLOYEE "), UserRole::Employee);
        assert_eq!(UserRole::from_code("contractor"), UserRole::Employee);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::Manager.to_string(), "manager");
        assert_eq!(UserRole::Employee.to_string(), "employee");
    }

    #[test]
    fn test_user_role_serde() {
        let role: UserRole = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert_eq!(serde_json::to_string(&UserRole::Manager).unwrap(), "\"manager\"");
    }

    #[test]
    fn test_user_role_checks() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Manager.is_admin());
        assert!(UserRole::Admin.is_manager_or_higher());
        assert!(UserRole::Manager.is_manager_or_higher());
        assert!(!UserRole::Employee.is_manager_or_higher());
    }
}
