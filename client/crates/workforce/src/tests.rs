//! Unit tests for the workforce crate
//! State containers run against a scripted API client

#[cfg(test)]
mod support {
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    use serde_json::Value;
    use session::{ApiClient, ApiRequest, AppError, AppResult};

    use crate::infra::RestRepository;

    #[derive(Clone)]
    enum Reply {
        Ok(Value),
        Fail(u16, Value),
    }

    #[derive(Default)]
    struct Script {
        once: HashMap<(String, String), VecDeque<Reply>>,
        sticky: HashMap<(String, String), Reply>,
        log: Vec<ApiRequest>,
    }

    /// Scripted API client
    ///
    /// One-shot replies are consumed first, then the sticky reply for the
    /// route. Unscripted routes answer 404.
    #[derive(Clone, Default)]
    pub struct FakeApi {
        script: Arc<Mutex<Script>>,
    }

    fn route(method: &str, path: &str) -> (String, String) {
        (method.to_string(), path.to_string())
    }

    impl FakeApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn repository(&self) -> RestRepository<FakeApi> {
            RestRepository::new(self.clone())
        }

        pub fn respond(&self, method: &str, path: &str, body: Value) {
            let mut script = self.script.lock().unwrap();
            script.sticky.insert(route(method, path), Reply::Ok(body));
        }

        pub fn respond_once(&self, method: &str, path: &str, body: Value) {
            let mut script = self.script.lock().unwrap();
            script
                .once
                .entry(route(method, path))
                .or_default()
                .push_back(Reply::Ok(body));
        }

        pub fn fail(&self, method: &str, path: &str, status: u16, payload: Value) {
            let mut script = self.script.lock().unwrap();
            script
                .sticky
                .insert(route(method, path), Reply::Fail(status, payload));
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.script.lock().unwrap().log.clone()
        }

        /// `"METHOD path"` for every request, in order
        pub fn calls(&self) -> Vec<String> {
            self.requests()
                .iter()
                .map(|r| format!("{} {}", r.method, r.path))
                .collect()
        }

        pub fn last(&self, method: &str, path: &str) -> Option<ApiRequest> {
            self.requests()
                .into_iter()
                .rev()
                .find(|r| r.method.as_str() == method && r.path == path)
        }
    }

    impl ApiClient for FakeApi {
        async fn send(&self, request: ApiRequest) -> AppResult<Value> {
            let mut script = self.script.lock().unwrap();
            let key = route(request.method.as_str(), &request.path);
            script.log.push(request);

            let reply = script
                .once
                .get_mut(&key)
                .and_then(VecDeque::pop_front)
                .or_else(|| script.sticky.get(&key).cloned());
            match reply {
                Some(Reply::Ok(body)) => Ok(body),
                Some(Reply::Fail(status, payload)) => {
                    Err(AppError::from_response(status, Some(payload)))
                }
                None => Err(AppError::not_found(format!(
                    "No reply scripted for {} {}",
                    key.0, key.1
                ))),
            }
        }
    }
}

#[cfg(test)]
mod admin_tests {
    use super::support::FakeApi;
    use crate::application::AdminStore;
    use crate::domain::{QueryParams, UserDraft};
    use kernel::error::kind::ErrorKind;
    use kernel::id::UserId;
    use serde_json::json;
    use session::UserRole;

    fn alice() -> serde_json::Value {
        json!({"id": 1, "name": "Alice", "email": "alice@acme.test", "role": "admin"})
    }

    fn ben() -> serde_json::Value {
        json!({"id": 2, "name": "Ben", "role": "employee", "department": "Ops"})
    }

    #[tokio::test]
    async fn test_fetch_users_publishes_list() {
        let api = FakeApi::new();
        api.respond("GET", "/users", json!([alice(), ben()]));
        let store = AdminStore::new(api.repository());
        let mut rx = store.subscribe();

        let users = store.fetch_users(&QueryParams::new()).await.unwrap();

        assert_eq!(users.len(), 2);
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.users, users);
        assert!(!state.status.loading);
        assert!(state.status.error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_users_sends_query() {
        let api = FakeApi::new();
        api.respond("GET", "/users", json!([]));
        let store = AdminStore::new(api.repository());

        let query = QueryParams::new().with("role", "manager").with("department", "Ops");
        store.fetch_users(&query).await.unwrap();

        let sent = api.last("GET", "/users").unwrap();
        assert_eq!(
            sent.query,
            vec![
                ("role".to_string(), "manager".to_string()),
                ("department".to_string(), "Ops".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_user_refetches_list() {
        let api = FakeApi::new();
        api.respond_once("GET", "/users", json!([alice()]));
        api.respond("POST", "/users", json!({"id": 2, "name": "Ben"}));
        api.respond("GET", "/users", json!([alice(), ben()]));
        let store = AdminStore::new(api.repository());
        store.fetch_users(&QueryParams::new()).await.unwrap();

        let draft = UserDraft {
            name: Some("Ben".into()),
            email: Some("ben@acme.test".into()),
            password: Some("secret-pw".into()),
            role: Some(UserRole::Employee),
            ..UserDraft::default()
        };
        let created = store.create_user(&draft).await.unwrap();

        assert_eq!(created["id"], 2);
        assert_eq!(store.snapshot().users.len(), 2);
        assert_eq!(
            api.calls(),
            vec!["GET /users", "POST /users", "GET /users"]
        );
        let body = api.last("POST", "/users").unwrap().body.unwrap();
        assert_eq!(body["role"], "employee");
        assert!(body.get("department").is_none());
    }

    #[tokio::test]
    async fn test_delete_user_refetches_list() {
        let api = FakeApi::new();
        api.respond("DELETE", "/users/2", serde_json::Value::Null);
        api.respond("GET", "/users", json!([alice()]));
        let store = AdminStore::new(api.repository());

        store.delete_user(&UserId::from_number(2)).await.unwrap();

        assert_eq!(api.calls(), vec!["DELETE /users/2", "GET /users"]);
        assert_eq!(store.snapshot().users.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_list_and_records_error() {
        let api = FakeApi::new();
        api.respond("GET", "/users", json!([alice()]));
        api.fail(
            "PUT",
            "/users/1",
            422,
            json!({"errors": ["Email has already been taken"]}),
        );
        let store = AdminStore::new(api.repository());
        store.fetch_users(&QueryParams::new()).await.unwrap();

        let draft = UserDraft {
            email: Some("taken@acme.test".into()),
            ..UserDraft::default()
        };
        let err = store
            .update_user(&UserId::from_number(1), &draft)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
        // No listing after a failed mutation
        assert_eq!(api.calls(), vec!["GET /users", "PUT /users/1"]);
        let state = store.snapshot();
        assert_eq!(state.users.len(), 1);
        assert!(!state.status.loading);
        let report = state.status.error.unwrap();
        assert_eq!(report.status, Some(422));
        assert_eq!(report.message, "Email has already been taken");
    }

    #[tokio::test]
    async fn test_next_operation_clears_previous_error() {
        let api = FakeApi::new();
        api.fail("GET", "/admin/dashboard", 500, json!({"error": "kaboom"}));
        let store = AdminStore::new(api.repository());
        assert!(store.fetch_dashboard().await.is_err());
        assert!(store.snapshot().status.error.is_some());

        api.respond("GET", "/admin/dashboard", json!({"total_users": 4}));
        store.fetch_dashboard().await.unwrap();

        let state = store.snapshot();
        assert!(state.status.error.is_none());
        assert_eq!(state.stats, Some(json!({"total_users": 4})));
    }

    #[tokio::test]
    async fn test_dashboard_is_kept_verbatim() {
        let api = FakeApi::new();
        // No figures are filled in for what the backend leaves out
        api.respond("GET", "/admin/dashboard", json!({"total_projects": 3}));
        let store = AdminStore::new(api.repository());

        let stats = store.fetch_dashboard().await.unwrap();

        assert_eq!(stats, json!({"total_projects": 3}));
        assert!(stats.get("total_users").is_none());
    }
}

#[cfg(test)]
mod project_tests {
    use super::support::FakeApi;
    use crate::application::ProjectStore;
    use crate::domain::ProjectDraft;
    use kernel::id::{ProjectId, UserId};
    use serde_json::json;

    fn apollo() -> serde_json::Value {
        json!({
            "id": 1,
            "name": "Apollo",
            "status": "active",
            "assigned_users": [{"id": 10, "name": "Ben"}]
        })
    }

    async fn loaded(api: &FakeApi) -> ProjectStore<crate::infra::RestRepository<FakeApi>> {
        api.respond_once(
            "GET",
            "/projects",
            json!([apollo(), {"id": 2, "name": "Zeus"}]),
        );
        api.respond_once("GET", "/projects/1", json!({"project": apollo()}));
        let store = ProjectStore::new(api.repository());
        store.fetch_all().await.unwrap();
        store.fetch_one(&ProjectId::from_number(1)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_fetch_one_sets_current() {
        let api = FakeApi::new();
        let store = loaded(&api).await;

        let state = store.snapshot();
        assert_eq!(state.projects.len(), 2);
        assert_eq!(state.current.unwrap().name, "Apollo");
    }

    #[tokio::test]
    async fn test_non_array_listing_is_empty() {
        let api = FakeApi::new();
        api.respond("GET", "/projects", json!({"message": "nothing here"}));
        let store = ProjectStore::new(api.repository());

        let projects = store.fetch_all().await.unwrap();

        assert!(projects.is_empty());
        assert!(store.snapshot().status.error.is_none());
    }

    #[tokio::test]
    async fn test_create_appends_and_wraps_body() {
        let api = FakeApi::new();
        let store = loaded(&api).await;
        api.respond(
            "POST",
            "/projects",
            json!({"project": {"id": 3, "name": "Hera"}}),
        );

        let draft = ProjectDraft {
            name: Some("Hera".into()),
            ..ProjectDraft::default()
        };
        let created = store.create(&draft).await.unwrap();

        assert_eq!(created.id, ProjectId::from_number(3));
        let names: Vec<_> = store
            .snapshot()
            .projects
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Apollo", "Zeus", "Hera"]);
        let body = api.last("POST", "/projects").unwrap().body.unwrap();
        assert_eq!(body, json!({"project": {"name": "Hera"}}));
    }

    #[tokio::test]
    async fn test_update_replaces_list_entry_and_current() {
        let api = FakeApi::new();
        let store = loaded(&api).await;
        api.respond(
            "PUT",
            "/projects/1",
            json!({"id": 1, "name": "Apollo II", "status": "done"}),
        );

        let draft = ProjectDraft {
            name: Some("Apollo II".into()),
            status: Some("done".into()),
            ..ProjectDraft::default()
        };
        store
            .update(&ProjectId::from_number(1), &draft)
            .await
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.projects[0].name, "Apollo II");
        assert_eq!(state.current.unwrap().status.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_delete_removes_from_list() {
        let api = FakeApi::new();
        let store = loaded(&api).await;
        api.respond("DELETE", "/projects/2", serde_json::Value::Null);

        store.delete(&ProjectId::from_number(2)).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.projects.len(), 1);
        assert_eq!(state.projects[0].name, "Apollo");
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_project() {
        let api = FakeApi::new();
        let store = loaded(&api).await;
        api.fail("DELETE", "/projects/2", 403, json!({"error": "Forbidden"}));

        assert!(store.delete(&ProjectId::from_number(2)).await.is_err());

        let state = store.snapshot();
        assert_eq!(state.projects.len(), 2);
        assert_eq!(state.status.error.unwrap().status, Some(403));
    }

    #[tokio::test]
    async fn test_assign_refetches_project() {
        let api = FakeApi::new();
        let store = loaded(&api).await;
        api.respond(
            "POST",
            "/projects/1/assign_user",
            json!({"message": "Users assigned"}),
        );
        api.respond(
            "GET",
            "/projects/1",
            json!({
                "id": 1,
                "name": "Apollo",
                "assigned_users": [{"id": 10}, {"id": 11}, {"id": 12}]
            }),
        );

        let users = [UserId::from_number(11), UserId::from_number(12)];
        let project = store
            .assign(&ProjectId::from_number(1), &users)
            .await
            .unwrap();

        assert_eq!(project.assigned_users.as_ref().unwrap().len(), 3);
        let body = api
            .last("POST", "/projects/1/assign_user")
            .unwrap()
            .body
            .unwrap();
        assert_eq!(body, json!({"user_ids": [11, 12]}));
        let state = store.snapshot();
        assert_eq!(state.projects[0].assigned_users.as_ref().unwrap().len(), 3);
        assert_eq!(state.current.unwrap().assigned_users.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unassign_removes_member_locally() {
        let api = FakeApi::new();
        let store = loaded(&api).await;
        api.respond(
            "DELETE",
            "/projects/1/unassign_user",
            json!({"message": "User unassigned"}),
        );

        store
            .unassign(&ProjectId::from_number(1), &UserId::from_number(10))
            .await
            .unwrap();

        let sent = api.last("DELETE", "/projects/1/unassign_user").unwrap();
        assert_eq!(sent.query, vec![("user_id".to_string(), "10".to_string())]);
        let state = store.snapshot();
        assert!(state.projects[0].assigned_users.as_ref().unwrap().is_empty());
        assert!(state.current.unwrap().assigned_users.unwrap().is_empty());
        // Only the unassign call itself; no re-fetch
        assert_eq!(api.calls().last().unwrap(), "DELETE /projects/1/unassign_user");
    }

    #[tokio::test]
    async fn test_clear_error() {
        let api = FakeApi::new();
        api.fail("GET", "/projects", 500, json!({"error": "kaboom"}));
        let store = ProjectStore::new(api.repository());
        let _ = store.fetch_all().await;
        assert!(store.snapshot().status.error.is_some());

        store.clear_error();

        assert!(store.snapshot().status.error.is_none());
    }
}

#[cfg(test)]
mod employee_tests {
    use super::support::FakeApi;
    use crate::application::EmployeeStore;
    use crate::domain::TaskStatus;
    use kernel::id::TaskId;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_tasks_decodes_statuses() {
        let api = FakeApi::new();
        api.respond(
            "GET",
            "/employee/tasks",
            json!([
                {"id": 1, "title": "Write report", "status": "In Progress"},
                {"id": 2, "title": "Review", "status": "completed"},
                {"id": 3, "title": "Plan", "status": "on_hold"}
            ]),
        );
        let store = EmployeeStore::new(api.repository());

        let tasks = store.fetch_tasks().await.unwrap();

        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert_eq!(tasks[1].status, TaskStatus::Completed);
        assert_eq!(tasks[2].status, TaskStatus::Other("on_hold".into()));
        assert_eq!(store.snapshot().open_tasks().count(), 2);
    }

    #[tokio::test]
    async fn test_non_array_tasks_is_empty() {
        let api = FakeApi::new();
        api.respond("GET", "/employee/tasks", json!({"tasks": "n/a"}));
        api.respond("GET", "/employee/projects", serde_json::Value::Null);
        let store = EmployeeStore::new(api.repository());

        assert!(store.fetch_tasks().await.unwrap().is_empty());
        assert!(store.fetch_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_refetches_tasks() {
        let api = FakeApi::new();
        api.respond_once(
            "GET",
            "/employee/tasks",
            json!([{"id": 7, "title": "Ship", "status": "pending"}]),
        );
        api.respond("PATCH", "/tasks/7", json!({"id": 7, "status": "blocked"}));
        api.respond(
            "GET",
            "/employee/tasks",
            json!([{"id": 7, "title": "Ship", "status": "blocked"}]),
        );
        let store = EmployeeStore::new(api.repository());
        store.fetch_tasks().await.unwrap();

        store
            .update_task_status(&TaskId::from_number(7), &TaskStatus::Blocked)
            .await
            .unwrap();

        let body = api.last("PATCH", "/tasks/7").unwrap().body.unwrap();
        assert_eq!(body, json!({"status": "blocked"}));
        assert_eq!(
            api.calls(),
            vec!["GET /employee/tasks", "PATCH /tasks/7", "GET /employee/tasks"]
        );
        assert_eq!(store.snapshot().tasks[0].status, TaskStatus::Blocked);
    }
}

#[cfg(test)]
mod manager_tests {
    use super::support::FakeApi;
    use crate::application::ManagerStore;
    use crate::domain::QueryParams;
    use serde_json::json;

    #[tokio::test]
    async fn test_reports_pass_query_through() {
        let api = FakeApi::new();
        api.respond("GET", "/manager/reports", json!({"weekly": []}));
        let store = ManagerStore::new(api.repository());

        let query = QueryParams::new()
            .with("start_date", "2026-01-01")
            .with("end_date", "2026-01-31");
        let reports = store.fetch_reports(&query).await.unwrap();

        assert_eq!(reports, json!({"weekly": []}));
        let sent = api.last("GET", "/manager/reports").unwrap();
        assert_eq!(sent.query.len(), 2);
        assert_eq!(sent.query[0].0, "start_date");
        assert_eq!(store.snapshot().reports, Some(json!({"weekly": []})));
    }

    #[tokio::test]
    async fn test_team_stats_and_projects() {
        let api = FakeApi::new();
        api.respond("GET", "/manager/team-activity", json!({"active_tasks": 5}));
        api.respond("GET", "/manager/projects", json!([{"id": 1, "name": "Apollo"}]));
        let store = ManagerStore::new(api.repository());

        store.fetch_team_stats().await.unwrap();
        store.fetch_projects().await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.team_stats, Some(json!({"active_tasks": 5})));
        assert_eq!(state.projects.len(), 1);
        assert!(state.reports.is_none());
    }
}

#[cfg(test)]
mod team_tests {
    use super::support::FakeApi;
    use crate::application::TeamDirectory;
    use kernel::id::UserId;
    use serde_json::json;
    use session::{UserIdentity, UserRole};

    fn roster() -> serde_json::Value {
        json!([
            {"id": 1, "name": "Alice", "role": "admin"},
            {"id": 2, "name": "Mia", "role": "manager", "functional_unit": "Platform"},
            {"id": 3, "name": "Ben", "role": "employee", "functional_unit": "Platform"},
            {"id": 4, "name": "Cho", "role": "employee", "department": "Sales"},
            {"id": 5, "name": "Dan", "role": "manager", "department": "Sales"}
        ])
    }

    fn viewer(id: i64, role: UserRole, unit: Option<&str>) -> UserIdentity {
        UserIdentity {
            id: UserId::from_number(id),
            name: String::new(),
            email: None,
            role,
            department: None,
            team: None,
            functional_unit: unit.map(str::to_string),
            manager_id: None,
        }
    }

    fn names(units: &[crate::domain::FunctionalUnit]) -> Vec<&str> {
        units.iter().map(|u| u.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_admin_sees_every_unit() {
        let api = FakeApi::new();
        api.respond("GET", "/users", roster());
        let directory = TeamDirectory::new(api.repository());

        let units = directory
            .load(&viewer(1, UserRole::Admin, None))
            .await
            .unwrap();

        assert_eq!(names(&units), vec!["Platform", "Sales", "Unassigned"]);
        assert_eq!(units[0].lead.as_ref().unwrap().name, "Mia");
        assert_eq!(units[1].member_count, 2);
        assert_eq!(directory.snapshot().units, units);
    }

    #[tokio::test]
    async fn test_manager_sees_units_they_lead() {
        let api = FakeApi::new();
        api.respond("GET", "/users", roster());
        let directory = TeamDirectory::new(api.repository());

        let units = directory
            .load(&viewer(5, UserRole::Manager, None))
            .await
            .unwrap();

        assert_eq!(names(&units), vec!["Sales"]);
    }

    #[tokio::test]
    async fn test_employee_sees_own_unit() {
        let api = FakeApi::new();
        api.respond("GET", "/users", roster());
        let directory = TeamDirectory::new(api.repository());

        let units = directory
            .load(&viewer(3, UserRole::Employee, Some("Platform")))
            .await
            .unwrap();

        assert_eq!(names(&units), vec!["Platform"]);
        assert_eq!(units[0].member_count, 2);
    }

    #[tokio::test]
    async fn test_failed_listing_leaves_units_empty() {
        let api = FakeApi::new();
        api.fail("GET", "/users", 403, json!({"error": "Forbidden"}));
        let directory = TeamDirectory::new(api.repository());

        let err = directory
            .load(&viewer(3, UserRole::Employee, Some("Platform")))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        let state = directory.snapshot();
        assert!(state.units.is_empty());
        assert!(state.status.error.is_some());
    }
}
