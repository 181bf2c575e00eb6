//! Project State Container
//!
//! Project registry plus the project currently being viewed. Mutation
//! results are reconciled locally:
//!
//! | operation | effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | create    | append to `projects`                                    |
//! | update    | replace in `projects`, and `current` when ids match     |
//! | delete    | remove from `projects`                                  |
//! | unassign  | drop the member from the list entry and from `current`  |
//! | assign    | re-fetch the project, then reconcile as an update       |

use kernel::id::{ProjectId, UserId};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::application::state::{LoadStatus, Tracked, tracked};
use crate::domain::entities::{Project, ProjectDraft};
use crate::domain::repository::ProjectRepository;
use crate::error::WorkforceResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectState {
    pub projects: Vec<Project>,
    pub current: Option<Project>,
    #[serde(flatten)]
    pub status: LoadStatus,
}

impl Tracked for ProjectState {
    fn load_status(&mut self) -> &mut LoadStatus {
        &mut self.status
    }
}

impl ProjectState {
    pub fn apply_created(&mut self, project: Project) {
        self.projects.push(project);
    }

    pub fn apply_updated(&mut self, project: Project) {
        if let Some(entry) = self.projects.iter_mut().find(|p| p.id == project.id) {
            *entry = project.clone();
        }
        if let Some(current) = self.current.as_mut().filter(|c| c.id == project.id) {
            *current = project;
        }
    }

    pub fn apply_deleted(&mut self, id: &ProjectId) {
        self.projects.retain(|p| &p.id != id);
    }

    pub fn apply_unassigned(&mut self, project: &ProjectId, user: &UserId) {
        if let Some(entry) = self.projects.iter_mut().find(|p| &p.id == project) {
            entry.remove_member(user);
        }
        if let Some(current) = self.current.as_mut().filter(|c| &c.id == project) {
            current.remove_member(user);
        }
    }
}

pub struct ProjectStore<R> {
    repo: R,
    state: watch::Sender<ProjectState>,
}

impl<R: ProjectRepository> ProjectStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: watch::Sender::new(ProjectState::default()),
        }
    }

    pub fn snapshot(&self) -> ProjectState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProjectState> {
        self.state.subscribe()
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.status.error.take().is_some());
    }

    pub async fn fetch_all(&self) -> WorkforceResult<Vec<Project>> {
        tracked(&self.state, self.repo.list_projects(), |s, projects| {
            s.projects = projects.clone();
        })
        .await
    }

    pub async fn fetch_one(&self, id: &ProjectId) -> WorkforceResult<Project> {
        tracked(&self.state, self.repo.get_project(id), |s, project| {
            s.current = Some(project.clone());
        })
        .await
    }

    pub async fn create(&self, draft: &ProjectDraft) -> WorkforceResult<Project> {
        tracked(&self.state, self.repo.create_project(draft), |s, project| {
            s.apply_created(project.clone());
        })
        .await
    }

    pub async fn update(&self, id: &ProjectId, draft: &ProjectDraft) -> WorkforceResult<Project> {
        tracked(&self.state, self.repo.update_project(id, draft), |s, project| {
            s.apply_updated(project.clone());
        })
        .await
    }

    pub async fn delete(&self, id: &ProjectId) -> WorkforceResult<()> {
        tracked(&self.state, self.repo.delete_project(id), |s, _| {
            s.apply_deleted(id);
        })
        .await
    }

    /// Assign members, then re-fetch the project to pick up the new list
    pub async fn assign(&self, id: &ProjectId, users: &[UserId]) -> WorkforceResult<Project> {
        let _: Value = tracked(&self.state, self.repo.assign_users(id, users), |_, _| {}).await?;
        tracked(&self.state, self.repo.get_project(id), |s, project| {
            s.apply_updated(project.clone());
        })
        .await
    }

    pub async fn unassign(&self, id: &ProjectId, user: &UserId) -> WorkforceResult<()> {
        tracked(&self.state, self.repo.unassign_user(id, user), |s, _| {
            s.apply_unassigned(id, user);
        })
        .await
    }
}
