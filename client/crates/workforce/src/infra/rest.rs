//! REST Repository Implementation
//!
//! Workforce endpoints over any [`ApiClient`] (normally the session's
//! request client, which handles credentials and refresh).

use kernel::id::{ProjectId, TaskId, UserId};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use session::{ApiClient, ApiRequest};

use crate::domain::entities::{Project, ProjectDraft, Task, UserDraft, UserRecord};
use crate::domain::repository::{ActivityRepository, ProjectRepository, UserRepository};
use crate::domain::value_objects::{QueryParams, TaskStatus};
use crate::error::{WorkforceError, WorkforceResult};

/// Backend-backed workforce repository
#[derive(Debug, Clone)]
pub struct RestRepository<C> {
    client: C,
}

impl<C: ApiClient + Sync> RestRepository<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    async fn get(&self, path: String, query: &QueryParams) -> WorkforceResult<Value> {
        let request = ApiRequest::get(path).with_query(query.pairs().iter().cloned());
        Ok(self.client.send(request).await?)
    }

    async fn send(&self, request: ApiRequest) -> WorkforceResult<Value> {
        Ok(self.client.send(request).await?)
    }
}

/// Decode a single record
fn decode<T: DeserializeOwned>(value: Value, what: &'static str) -> WorkforceResult<T> {
    serde_json::from_value(value).map_err(|source| WorkforceError::Decode { what, source })
}

/// Decode a single record that may come wrapped as `{ "<key>": {...} }`
fn decode_wrapped<T: DeserializeOwned>(
    value: Value,
    key: &str,
    what: &'static str,
) -> WorkforceResult<T> {
    let value = match value {
        Value::Object(mut object) if object.get(key).is_some_and(Value::is_object) => {
            object.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    };
    decode(value, what)
}

/// Decode a list payload
///
/// A payload that is not an array counts as an empty list. Entries that do
/// not decode are skipped with a warning rather than failing the listing.
fn decode_list<T: DeserializeOwned>(value: Value, what: &'static str) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Vec::new(),
        _ => {
            tracing::warn!(what = %what, "List endpoint returned a non-array payload");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(what = %what, index, error = %e, "Skipping undecodable entry");
                None
            }
        })
        .collect()
}

impl<C: ApiClient + Sync> UserRepository for RestRepository<C> {
    async fn list_users(&self, query: &QueryParams) -> WorkforceResult<Vec<UserRecord>> {
        let payload = self.get("/users".to_string(), query).await?;
        Ok(decode_list(payload, "user"))
    }

    async fn create_user(&self, draft: &UserDraft) -> WorkforceResult<Value> {
        let body = encode_body(draft)?;
        self.send(ApiRequest::post("/users", body)).await
    }

    async fn update_user(&self, id: &UserId, draft: &UserDraft) -> WorkforceResult<Value> {
        let body = encode_body(draft)?;
        self.send(ApiRequest::put(format!("/users/{id}"), body)).await
    }

    async fn delete_user(&self, id: &UserId) -> WorkforceResult<()> {
        self.send(ApiRequest::delete(format!("/users/{id}"))).await?;
        Ok(())
    }

    async fn admin_dashboard(&self) -> WorkforceResult<Value> {
        self.get("/admin/dashboard".to_string(), &QueryParams::new())
            .await
    }
}

impl<C: ApiClient + Sync> ProjectRepository for RestRepository<C> {
    async fn list_projects(&self) -> WorkforceResult<Vec<Project>> {
        let payload = self.get("/projects".to_string(), &QueryParams::new()).await?;
        Ok(decode_list(payload, "project"))
    }

    async fn get_project(&self, id: &ProjectId) -> WorkforceResult<Project> {
        let payload = self
            .get(format!("/projects/{id}"), &QueryParams::new())
            .await?;
        decode_wrapped(payload, "project", "project")
    }

    async fn create_project(&self, draft: &ProjectDraft) -> WorkforceResult<Project> {
        let body = json!({ "project": encode_body(draft)? });
        let payload = self.send(ApiRequest::post("/projects", body)).await?;
        decode_wrapped(payload, "project", "project")
    }

    async fn update_project(
        &self,
        id: &ProjectId,
        draft: &ProjectDraft,
    ) -> WorkforceResult<Project> {
        let body = json!({ "project": encode_body(draft)? });
        let payload = self
            .send(ApiRequest::put(format!("/projects/{id}"), body))
            .await?;
        decode_wrapped(payload, "project", "project")
    }

    async fn delete_project(&self, id: &ProjectId) -> WorkforceResult<()> {
        self.send(ApiRequest::delete(format!("/projects/{id}")))
            .await?;
        Ok(())
    }

    async fn assign_users(&self, id: &ProjectId, users: &[UserId]) -> WorkforceResult<Value> {
        let body = json!({ "user_ids": users });
        self.send(ApiRequest::post(format!("/projects/{id}/assign_user"), body))
            .await
    }

    async fn unassign_user(&self, id: &ProjectId, user: &UserId) -> WorkforceResult<()> {
        let request = ApiRequest::delete(format!("/projects/{id}/unassign_user"))
            .with_query([("user_id", user.to_string())]);
        self.send(request).await?;
        Ok(())
    }
}

impl<C: ApiClient + Sync> ActivityRepository for RestRepository<C> {
    async fn my_tasks(&self) -> WorkforceResult<Vec<Task>> {
        let payload = self
            .get("/employee/tasks".to_string(), &QueryParams::new())
            .await?;
        Ok(decode_list(payload, "task"))
    }

    async fn my_projects(&self) -> WorkforceResult<Vec<Project>> {
        let payload = self
            .get("/employee/projects".to_string(), &QueryParams::new())
            .await?;
        Ok(decode_list(payload, "project"))
    }

    async fn update_task_status(&self, id: &TaskId, status: &TaskStatus) -> WorkforceResult<Value> {
        let body = json!({ "status": status });
        self.send(ApiRequest::patch(format!("/tasks/{id}"), body))
            .await
    }

    async fn team_activity(&self) -> WorkforceResult<Value> {
        self.get("/manager/team-activity".to_string(), &QueryParams::new())
            .await
    }

    async fn team_projects(&self) -> WorkforceResult<Vec<Project>> {
        let payload = self
            .get("/manager/projects".to_string(), &QueryParams::new())
            .await?;
        Ok(decode_list(payload, "project"))
    }

    async fn team_reports(&self, query: &QueryParams) -> WorkforceResult<Value> {
        self.get("/manager/reports".to_string(), query).await
    }
}

fn encode_body<T: serde::Serialize>(draft: &T) -> WorkforceResult<Value> {
    serde_json::to_value(draft).map_err(|source| WorkforceError::Decode {
        what: "request",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_list_non_array_is_empty() {
        let users: Vec<UserRecord> = decode_list(json!({"users": []}), "user");
        assert!(users.is_empty());
        let users: Vec<UserRecord> = decode_list(Value::Null, "user");
        assert!(users.is_empty());
    }

    #[test]
    fn test_decode_list_skips_bad_entries() {
        let tasks: Vec<Task> = decode_list(
            json!([{"id": 1, "title": "ok"}, {"title": "no id"}, {"id": 3}]),
            "task",
        );
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_decode_wrapped_accepts_both_shapes() {
        let plain: Project =
            decode_wrapped(json!({"id": 1, "name": "Apollo"}), "project", "project").unwrap();
        let wrapped: Project = decode_wrapped(
            json!({"project": {"id": 1, "name": "Apollo"}}),
            "project",
            "project",
        )
        .unwrap();
        assert_eq!(plain, wrapped);
    }

    #[test]
    fn test_decode_wrapped_reports_shape_errors() {
        let err = decode_wrapped::<Project>(json!([1, 2]), "project", "project").unwrap_err();
        assert!(matches!(err, WorkforceError::Decode { what: "project", .. }));
    }
}
