//! Manager State Container
//!
//! Team statistics and reports are kept exactly as the backend returns
//! them. Nothing here derives or fills in figures.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::application::state::{LoadStatus, Tracked, tracked};
use crate::domain::entities::Project;
use crate::domain::repository::ActivityRepository;
use crate::domain::value_objects::QueryParams;
use crate::error::WorkforceResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ManagerState {
    pub team_stats: Option<Value>,
    pub projects: Vec<Project>,
    pub reports: Option<Value>,
    #[serde(flatten)]
    pub status: LoadStatus,
}

impl Tracked for ManagerState {
    fn load_status(&mut self) -> &mut LoadStatus {
        &mut self.status
    }
}

pub struct ManagerStore<R> {
    repo: R,
    state: watch::Sender<ManagerState>,
}

impl<R: ActivityRepository> ManagerStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: watch::Sender::new(ManagerState::default()),
        }
    }

    pub fn snapshot(&self) -> ManagerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ManagerState> {
        self.state.subscribe()
    }

    pub async fn fetch_team_stats(&self) -> WorkforceResult<Value> {
        tracked(&self.state, self.repo.team_activity(), |s, stats| {
            s.team_stats = Some(stats.clone());
        })
        .await
    }

    pub async fn fetch_projects(&self) -> WorkforceResult<Vec<Project>> {
        tracked(&self.state, self.repo.team_projects(), |s, projects| {
            s.projects = projects.clone();
        })
        .await
    }

    pub async fn fetch_reports(&self, query: &QueryParams) -> WorkforceResult<Value> {
        tracked(&self.state, self.repo.team_reports(query), |s, reports| {
            s.reports = Some(reports.clone());
        })
        .await
    }
}
