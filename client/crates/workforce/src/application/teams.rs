//! Team Directory
//!
//! Functional units built from the user registry and filtered to what the
//! viewer may see.

use serde::Serialize;
use session::UserIdentity;
use tokio::sync::watch;

use crate::application::state::{LoadStatus, Tracked, tracked};
use crate::domain::repository::UserRepository;
use crate::domain::services::{FunctionalUnit, group_units, visible_units};
use crate::domain::value_objects::QueryParams;
use crate::error::{WorkforceError, WorkforceResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamState {
    pub units: Vec<FunctionalUnit>,
    #[serde(flatten)]
    pub status: LoadStatus,
}

impl Tracked for TeamState {
    fn load_status(&mut self) -> &mut LoadStatus {
        &mut self.status
    }
}

pub struct TeamDirectory<R> {
    repo: R,
    state: watch::Sender<TeamState>,
}

impl<R: UserRepository> TeamDirectory<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: watch::Sender::new(TeamState::default()),
        }
    }

    pub fn snapshot(&self) -> TeamState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TeamState> {
        self.state.subscribe()
    }

    pub async fn load(&self, viewer: &UserIdentity) -> WorkforceResult<Vec<FunctionalUnit>> {
        let work = async {
            let users = self.repo.list_users(&QueryParams::new()).await?;
            Ok::<_, WorkforceError>(visible_units(group_units(&users), viewer))
        };
        tracked(&self.state, work, |s, units| {
            s.units = units.clone();
        })
        .await
    }
}
