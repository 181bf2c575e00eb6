//! Admin State Container
//!
//! User registry and organization statistics. Every successful user
//! mutation is followed by a fresh listing, so `users` always reflects the
//! backend rather than a local guess.

use kernel::id::UserId;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::application::state::{LoadStatus, Tracked, tracked};
use crate::domain::entities::{UserDraft, UserRecord};
use crate::domain::repository::UserRepository;
use crate::domain::value_objects::QueryParams;
use crate::error::WorkforceResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminState {
    pub users: Vec<UserRecord>,
    /// `/admin/dashboard` payload as received
    pub stats: Option<Value>,
    #[serde(flatten)]
    pub status: LoadStatus,
}

impl Tracked for AdminState {
    fn load_status(&mut self) -> &mut LoadStatus {
        &mut self.status
    }
}

pub struct AdminStore<R> {
    repo: R,
    state: watch::Sender<AdminState>,
}

impl<R: UserRepository> AdminStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: watch::Sender::new(AdminState::default()),
        }
    }

    pub fn snapshot(&self) -> AdminState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdminState> {
        self.state.subscribe()
    }

    pub async fn fetch_users(&self, query: &QueryParams) -> WorkforceResult<Vec<UserRecord>> {
        tracked(&self.state, self.repo.list_users(query), |s, users| {
            s.users = users.clone();
        })
        .await
    }

    pub async fn create_user(&self, draft: &UserDraft) -> WorkforceResult<Value> {
        let created = tracked(&self.state, self.repo.create_user(draft), |_, _| {}).await?;
        self.refetch().await;
        Ok(created)
    }

    pub async fn update_user(&self, id: &UserId, draft: &UserDraft) -> WorkforceResult<Value> {
        let updated = tracked(&self.state, self.repo.update_user(id, draft), |_, _| {}).await?;
        self.refetch().await;
        Ok(updated)
    }

    pub async fn delete_user(&self, id: &UserId) -> WorkforceResult<()> {
        tracked(&self.state, self.repo.delete_user(id), |_, _| {}).await?;
        self.refetch().await;
        Ok(())
    }

    pub async fn fetch_dashboard(&self) -> WorkforceResult<Value> {
        tracked(&self.state, self.repo.admin_dashboard(), |s, stats| {
            s.stats = Some(stats.clone());
        })
        .await
    }

    // The mutation already succeeded; a failed listing only shows up in
    // state.error
    async fn refetch(&self) {
        let _ = self.fetch_users(&QueryParams::new()).await;
    }
}
