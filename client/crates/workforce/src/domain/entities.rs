//! Domain Entities
//!
//! Records as the backend reports them. Fields the client does not
//! interpret are kept in `extra` and written back out unchanged, so
//! printing a record never loses data.

use kernel::id::{ProjectId, TaskId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use session::UserRole;

use crate::domain::value_objects::TaskStatus;

// ============================================================================
// Users
// ============================================================================

/// User record (admin registry, team rosters)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
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
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /users` and `PUT /users/{id}`
///
/// Absent fields are omitted, so an update only touches what was given.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functional_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<UserId>,
}

impl UserDraft {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.role.is_none()
            && self.department.is_none()
            && self.team.is_none()
            && self.functional_unit.is_none()
            && self.manager_id.is_none()
    }
}

// ============================================================================
// Projects
// ============================================================================

/// Member entry inside a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedUser {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// `None` when the backend did not include the member list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_users: Option<Vec<AssignedUser>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Drop `user` from the member list, if the list is known
    pub fn remove_member(&mut self, user: &UserId) -> bool {
        match self.assigned_users.as_mut() {
            Some(members) => {
                let before = members.len();
                members.retain(|m| &m.id != user);
                members.len() != before
            }
            None => false,
        }
    }
}

/// Body of `POST /projects` and `PUT /projects/{id}`, wrapped as
/// `{ "project": { ... } }` on the wire
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_record_keeps_unknown_fields() {
        let value = json!({
            "id": 5,
            "name": "Eve",
            "role": "employee",
            "functional_unit": "Platform",
            "productivity_score": 87
        });
        let user: UserRecord = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(user.functional_unit.as_deref(), Some("Platform"));
        assert_eq!(user.extra["productivity_score"], 87);

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["productivity_score"], 87);
    }

    #[test]
    fn test_user_draft_omits_absent_fields() {
        let draft = UserDraft {
            role: Some(UserRole::Manager),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&draft).unwrap(), json!({"role": "manager"}));
        assert!(!draft.is_empty());
        assert!(UserDraft::default().is_empty());
    }

    #[test]
    fn test_project_remove_member() {
        let mut project: Project = serde_json::from_value(json!({
            "id": 1,
            "name": "Apollo",
            "assigned_users": [{"id": 2, "name": "Ben"}, {"id": 3, "name": "Cy"}]
        }))
        .unwrap();

        assert!(project.remove_member(&UserId::from_number(2)));
        assert!(!project.remove_member(&UserId::from_number(9)));
        assert_eq!(project.assigned_users.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_project_without_member_list() {
        let mut project: Project =
            serde_json::from_value(json!({"id": "p-1", "name": "Zeus", "members": 4})).unwrap();
        assert!(project.assigned_users.is_none());
        assert!(!project.remove_member(&UserId::from_number(1)));
        assert_eq!(project.extra["members"], 4);
    }

    #[test]
    fn test_task_decodes_display_status() {
        let task: Task = serde_json::from_value(json!({
            "id": 7,
            "title": "Auth interceptor",
            "status": "In Progress",
            "priority": "High"
        }))
        .unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
    }
}
