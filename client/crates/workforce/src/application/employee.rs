//! Employee State Container

use kernel::id::TaskId;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::application::state::{LoadStatus, Tracked, tracked};
use crate::domain::entities::{Project, Task};
use crate::domain::repository::ActivityRepository;
use crate::domain::value_objects::TaskStatus;
use crate::error::WorkforceResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmployeeState {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    #[serde(flatten)]
    pub status: LoadStatus,
}

impl Tracked for EmployeeState {
    fn load_status(&mut self) -> &mut LoadStatus {
        &mut self.status
    }
}

impl EmployeeState {
    pub fn open_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.status.is_open())
    }
}

pub struct EmployeeStore<R> {
    repo: R,
    state: watch::Sender<EmployeeState>,
}

impl<R: ActivityRepository> EmployeeStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: watch::Sender::new(EmployeeState::default()),
        }
    }

    pub fn snapshot(&self) -> EmployeeState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EmployeeState> {
        self.state.subscribe()
    }

    pub async fn fetch_tasks(&self) -> WorkforceResult<Vec<Task>> {
        tracked(&self.state, self.repo.my_tasks(), |s, tasks| {
            s.tasks = tasks.clone();
        })
        .await
    }

    pub async fn fetch_projects(&self) -> WorkforceResult<Vec<Project>> {
        tracked(&self.state, self.repo.my_projects(), |s, projects| {
            s.projects = projects.clone();
        })
        .await
    }

    /// Change a task's status, then reload the task list
    pub async fn update_task_status(
        &self,
        id: &TaskId,
        status: &TaskStatus,
    ) -> WorkforceResult<Value> {
        let response =
            tracked(&self.state, self.repo.update_task_status(id, status), |_, _| {}).await?;
        let _ = self.fetch_tasks().await;
        Ok(response)
    }
}
