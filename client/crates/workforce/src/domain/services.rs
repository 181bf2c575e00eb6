//! Domain Services
//!
//! Pure domain logic: functional units derived from user records, and the
//! role checks the client applies before calling role-restricted endpoints.

use std::collections::BTreeMap;

use kernel::id::UserId;
use serde::Serialize;
use session::{UserIdentity, UserRole};

use crate::domain::entities::UserRecord;
use crate::error::{WorkforceError, WorkforceResult};

/// Unit name for users with neither a functional unit nor a department
pub const UNASSIGNED_UNIT: &str = "Unassigned";

/// Unit a user belongs to: functional unit, then department, then
/// [`UNASSIGNED_UNIT`]
pub fn unit_name<'a>(functional_unit: Option<&'a str>, department: Option<&'a str>) -> &'a str {
    [functional_unit, department]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(UNASSIGNED_UNIT)
}

/// Lead of a unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitLead {
    pub id: UserId,
    pub name: String,
}

/// Team derived from user records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionalUnit {
    pub name: String,
    /// First member with the manager role
    pub lead: Option<UnitLead>,
    pub member_count: usize,
    pub members: Vec<UserRecord>,
}

impl FunctionalUnit {
    fn new(name: String, members: Vec<UserRecord>) -> Self {
        let lead = members
            .iter()
            .find(|m| m.role == UserRole::Manager)
            .map(|m| UnitLead {
                id: m.id.clone(),
                name: m.name.clone(),
            });
        Self {
            name,
            lead,
            member_count: members.len(),
            members,
        }
    }

    pub fn is_led_by(&self, user: &UserId) -> bool {
        self.lead.as_ref().is_some_and(|lead| &lead.id == user)
    }
}

/// Group users into functional units
///
/// Units are ordered by name with [`UNASSIGNED_UNIT`] last; members keep
/// the order they were given in.
pub fn group_units(users: &[UserRecord]) -> Vec<FunctionalUnit> {
    let mut grouped: BTreeMap<String, Vec<UserRecord>> = BTreeMap::new();
    for user in users {
        let name = unit_name(user.functional_unit.as_deref(), user.department.as_deref());
        grouped.entry(name.to_string()).or_default().push(user.clone());
    }

    let unassigned = grouped.remove(UNASSIGNED_UNIT);
    grouped
        .into_iter()
        .chain(unassigned.map(|members| (UNASSIGNED_UNIT.to_string(), members)))
        .map(|(name, members)| FunctionalUnit::new(name, members))
        .collect()
}

/// Units `viewer` may see
///
/// - admin: every unit
/// - manager: units they lead
/// - employee: the unit they belong to
pub fn visible_units(units: Vec<FunctionalUnit>, viewer: &UserIdentity) -> Vec<FunctionalUnit> {
    match viewer.role {
        UserRole::Admin => units,
        UserRole::Manager => units
            .into_iter()
            .filter(|unit| unit.is_led_by(&viewer.id))
            .collect(),
        UserRole::Employee => {
            let own = unit_name(viewer.functional_unit.as_deref(), viewer.department.as_deref());
            units.into_iter().filter(|unit| unit.name == own).collect()
        }
    }
}

/// Reject `action` unless `role` is at least `required`
pub fn ensure_role(role: UserRole, required: UserRole, action: &'static str) -> WorkforceResult<()> {
    let allowed = match required {
        UserRole::Admin => role.is_admin(),
        UserRole::Manager => role.is_manager_or_higher(),
        UserRole::Employee => true,
    };
    if allowed {
        Ok(())
    } else {
        Err(WorkforceError::NotPermitted { role, action })
    }
}
