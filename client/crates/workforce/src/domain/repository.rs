//! Repository Traits
//!
//! Interface to the workforce endpoints of the backend. Implementation is
//! in the infrastructure layer.

use kernel::id::{ProjectId, TaskId, UserId};
use serde_json::Value;

use crate::domain::entities::{Project, ProjectDraft, Task, UserDraft, UserRecord};
use crate::domain::value_objects::{QueryParams, TaskStatus};
use crate::error::WorkforceResult;

/// User administration (`/users`, `/admin/dashboard`)
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn list_users(&self, query: &QueryParams) -> WorkforceResult<Vec<UserRecord>>;

    /// Returns the backend's response unchanged
    async fn create_user(&self, draft: &UserDraft) -> WorkforceResult<Value>;

    async fn update_user(&self, id: &UserId, draft: &UserDraft) -> WorkforceResult<Value>;

    async fn delete_user(&self, id: &UserId) -> WorkforceResult<()>;

    async fn admin_dashboard(&self) -> WorkforceResult<Value>;
}

/// Project registry (`/projects`)
#[trait_variant::make(ProjectRepository: Send)]
pub trait LocalProjectRepository {
    async fn list_projects(&self) -> WorkforceResult<Vec<Project>>;

    async fn get_project(&self, id: &ProjectId) -> WorkforceResult<Project>;

    async fn create_project(&self, draft: &ProjectDraft) -> WorkforceResult<Project>;

    async fn update_project(&self, id: &ProjectId, draft: &ProjectDraft)
    -> WorkforceResult<Project>;

    async fn delete_project(&self, id: &ProjectId) -> WorkforceResult<()>;

    async fn assign_users(&self, id: &ProjectId, users: &[UserId]) -> WorkforceResult<Value>;

    async fn unassign_user(&self, id: &ProjectId, user: &UserId) -> WorkforceResult<()>;
}

/// Employee and manager views (`/employee/*`, `/manager/*`, `/tasks`)
#[trait_variant::make(ActivityRepository: Send)]
pub trait LocalActivityRepository {
    async fn my_tasks(&self) -> WorkforceResult<Vec<Task>>;

    async fn my_projects(&self) -> WorkforceResult<Vec<Project>>;

    async fn update_task_status(&self, id: &TaskId, status: &TaskStatus) -> WorkforceResult<Value>;

    async fn team_activity(&self) -> WorkforceResult<Value>;

    async fn team_projects(&self) -> WorkforceResult<Vec<Project>>;

    async fn team_reports(&self, query: &QueryParams) -> WorkforceResult<Value>;
}
