//! Command Dispatch
//!
//! Each command runs against an already started session and yields the
//! JSON document to print.

use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult};
use platform::bridge::{CompanionBridge, NoopBridge, TcpCompanionBridge};
use platform::config::ClientConfig;
use platform::storage::FileStore;
use platform::transport::ReqwestTransport;
use serde::Serialize;
use serde_json::{Value, json};
use session::{
    DurableSessionStore, RegisterInput, RequestClient, SessionConfig, SessionContext,
    SessionStatus, UserIdentity, UserRole,
};
use workforce::domain::ensure_role;
use workforce::{
    AdminStore, EmployeeStore, ManagerStore, ProjectStore, RestRepository,
    TeamDirectory, UserDraft, WorkforceResult,
};

use crate::cli::{
    Command, DashboardCommand, ProjectsCommand, TasksCommand, UsersCommand, query,
};

type Persistence = DurableSessionStore<FileStore>;
type Session = SessionContext<ReqwestTransport, Persistence>;
type Repository = RestRepository<RequestClient<ReqwestTransport, Persistence>>;

/// Wired client
pub struct App {
    pub session: Session,
}

impl App {
    pub fn connect(config: &ClientConfig) -> anyhow::Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config)?);
        let persistence = DurableSessionStore::new(FileStore::new(config.session_file()));
        let bridge: Arc<dyn CompanionBridge> = match config.companion_addr {
            Some(addr) => Arc::new(TcpCompanionBridge::new(addr)),
            None => Arc::new(NoopBridge),
        };
        let session = SessionContext::new(transport, persistence, SessionConfig::default(), bridge);
        Ok(Self { session })
    }

    fn repository(&self) -> Repository {
        RestRepository::new(self.session.request_client())
    }

    /// Signed-in user, or an error telling how to sign in
    fn viewer(&self) -> AppResult<UserIdentity> {
        let state = self.session.state();
        match (state.status, state.identity) {
            (SessionStatus::Authenticated, Some(identity)) => Ok(identity),
            _ => Err(AppError::unauthorized("Not signed in").with_action("Run `workpulse login`")),
        }
    }

    pub async fn run(&self, command: Command) -> AppResult<Value> {
        match command {
            Command::Login { email, password } => {
                let state = self.session.sign_in(&email, password).await?;
                to_json(&state)
            }
            Command::Register {
                organization,
                name,
                email,
                password,
            } => {
                let input = RegisterInput {
                    organization_name: organization,
                    name,
                    email,
                    password,
                };
                let state = self.session.register(input).await?;
                to_json(&state)
            }
            Command::Logout => {
                self.session.logout().await?;
                to_json(&self.session.state())
            }
            Command::Whoami => to_json(&self.session.state()),
            Command::Users { command } => {
                let viewer = self.viewer()?;
                ensure_role(viewer.role, UserRole::Admin, "manage users")?;
                self.users(command).await
            }
            Command::Projects { command } => {
                self.viewer()?;
                self.projects(command).await
            }
            Command::Tasks { command } => {
                self.viewer()?;
                self.tasks(command).await
            }
            Command::Teams => {
                let viewer = self.viewer()?;
                let directory = TeamDirectory::new(self.repository());
                let units = directory.load(&viewer).await?;
                to_json(&units)
            }
            Command::Dashboard { command } => {
                let viewer = self.viewer()?;
                self.dashboard(viewer.role, command).await
            }
        }
    }

    async fn users(&self, command: UsersCommand) -> AppResult<Value> {
        let store = AdminStore::new(self.repository());
        match command {
            UsersCommand::List { filters } => to_json(&store.fetch_users(&query(filters)).await?),
            UsersCommand::Create { fields } => Ok(store.create_user(&fields.into()).await?),
            UsersCommand::Update { id, fields } => {
                let draft: UserDraft = fields.into();
                if draft.is_empty() {
                    return Err(AppError::bad_request("Nothing to update")
                        .with_action("Pass at least one field, e.g. --name"));
                }
                Ok(store.update_user(&id, &draft).await?)
            }
            UsersCommand::Delete { id } => {
                store.delete_user(&id).await?;
                Ok(json!({ "deleted": id }))
            }
        }
    }

    async fn projects(&self, command: ProjectsCommand) -> AppResult<Value> {
        let store = ProjectStore::new(self.repository());
        match command {
            ProjectsCommand::List => to_json(&store.fetch_all().await?),
            ProjectsCommand::Show { id } => to_json(&store.fetch_one(&id).await?),
            ProjectsCommand::Create { fields } => to_json(&store.create(&fields.into()).await?),
            ProjectsCommand::Update { id, fields } => {
                to_json(&store.update(&id, &fields.into()).await?)
            }
            ProjectsCommand::Delete { id } => {
                store.delete(&id).await?;
                Ok(json!({ "deleted": id }))
            }
            ProjectsCommand::Assign { id, users } => to_json(&store.assign(&id, &users).await?),
            ProjectsCommand::Unassign { id, user } => {
                store.unassign(&id, &user).await?;
                Ok(json!({ "project": id, "unassigned": user }))
            }
        }
    }

    async fn tasks(&self, command: TasksCommand) -> AppResult<Value> {
        let store = EmployeeStore::new(self.repository());
        match command {
            TasksCommand::Mine => to_json(&store.fetch_tasks().await?),
            TasksCommand::SetStatus { id, status } => {
                store.update_task_status(&id, &status).await?;
                to_json(&store.snapshot().tasks)
            }
        }
    }

    async fn dashboard(&self, role: UserRole, command: DashboardCommand) -> AppResult<Value> {
        match command {
            DashboardCommand::Admin => {
                ensure_role(role, UserRole::Admin, "view the admin dashboard")?;
                let store = AdminStore::new(self.repository());
                Ok(store.fetch_dashboard().await?)
            }
            DashboardCommand::Manager { report } => {
                ensure_role(role, UserRole::Manager, "view the manager dashboard")?;
                let store = ManagerStore::new(self.repository());
                load_all([
                    store.fetch_team_stats().await.map(drop),
                    store.fetch_projects().await.map(drop),
                    store.fetch_reports(&query(report)).await.map(drop),
                ])?;
                to_json(&store.snapshot())
            }
            DashboardCommand::Employee => {
                let store = EmployeeStore::new(self.repository());
                load_all([
                    store.fetch_tasks().await.map(drop),
                    store.fetch_projects().await.map(drop),
                ])?;
                to_json(&store.snapshot())
            }
        }
    }
}

/// First failure among dashboard sections
fn load_all<const N: usize>(sections: [WorkforceResult<()>; N]) -> AppResult<()> {
    for section in sections {
        section?;
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> AppResult<Value> {
    Ok(serde_json::to_value(value)?)
}
