//! Command Line Definition

use clap::{Parser, Subcommand};
use kernel::id::{ProjectId, TaskId, UserId};
use session::UserRole;
use workforce::{ProjectDraft, QueryParams, TaskStatus, UserDraft};

#[derive(Parser)]
#[command(name = "workpulse")]
#[command(about = "WorkPulse workforce management client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "WORKPULSE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an organization and sign in as its owner
    Register {
        #[arg(long)]
        organization: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "WORKPULSE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the session and remove stored credentials
    Logout,
    /// Show the current session
    Whoami,
    /// User administration (admin only)
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },
    Tasks {
        #[command(subcommand)]
        command: TasksCommand,
    },
    /// Functional units visible to the signed-in user
    Teams,
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommand,
    },
}

#[derive(Subcommand)]
pub enum UsersCommand {
    List {
        /// Filter as `key=value`, repeatable (e.g. `manager_id=3`)
        #[arg(long = "filter", value_parser = parse_pair)]
        filters: Vec<(String, String)>,
    },
    Create {
        #[command(flatten)]
        fields: UserFields,
    },
    Update {
        #[arg(value_parser = parse_user_id)]
        id: UserId,
        #[command(flatten)]
        fields: UserFields,
    },
    Delete {
        #[arg(value_parser = parse_user_id)]
        id: UserId,
    },
}

#[derive(clap::Args)]
pub struct UserFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long, value_parser = parse_role)]
    pub role: Option<UserRole>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub team: Option<String>,
    #[arg(long)]
    pub functional_unit: Option<String>,
    #[arg(long, value_parser = parse_user_id)]
    pub manager_id: Option<UserId>,
}

impl From<UserFields> for UserDraft {
    fn from(fields: UserFields) -> Self {
        UserDraft {
            name: fields.name,
            email: fields.email,
            password: fields.password,
            role: fields.role,
            department: fields.department,
            team: fields.team,
            functional_unit: fields.functional_unit,
            manager_id: fields.manager_id,
        }
    }
}

#[derive(Subcommand)]
pub enum ProjectsCommand {
    List,
    Show {
        #[arg(value_parser = parse_project_id)]
        id: ProjectId,
    },
    Create {
        #[command(flatten)]
        fields: ProjectFields,
    },
    Update {
        #[arg(value_parser = parse_project_id)]
        id: ProjectId,
        #[command(flatten)]
        fields: ProjectFields,
    },
    Delete {
        #[arg(value_parser = parse_project_id)]
        id: ProjectId,
    },
    Assign {
        #[arg(value_parser = parse_project_id)]
        id: ProjectId,
        #[arg(long = "user", required = true, value_parser = parse_user_id)]
        users: Vec<UserId>,
    },
    Unassign {
        #[arg(value_parser = parse_project_id)]
        id: ProjectId,
        #[arg(long = "user", value_parser = parse_user_id)]
        user: UserId,
    },
}

#[derive(clap::Args)]
pub struct ProjectFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

impl From<ProjectFields> for ProjectDraft {
    fn from(fields: ProjectFields) -> Self {
        ProjectDraft {
            name: fields.name,
            description: fields.description,
            status: fields.status,
        }
    }
}

#[derive(Subcommand)]
pub enum TasksCommand {
    /// Tasks assigned to the signed-in user
    Mine,
    SetStatus {
        #[arg(value_parser = parse_task_id)]
        id: TaskId,
        /// pending, in_progress, completed or blocked
        status: TaskStatus,
    },
}

#[derive(Subcommand)]
pub enum DashboardCommand {
    Admin,
    Manager {
        /// Report parameter as `key=value`, repeatable
        #[arg(long = "report", value_parser = parse_pair)]
        report: Vec<(String, String)>,
    },
    Employee,
}

pub fn query(pairs: Vec<(String, String)>) -> QueryParams {
    pairs.into_iter().collect()
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn parse_role(raw: &str) -> Result<UserRole, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "admin" | "manager" | "employee" => Ok(UserRole::from_code(raw)),
        _ => Err(format!("unknown role '{raw}' (expected admin, manager or employee)")),
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, String> {
    non_empty(raw).map(UserId::parse)
}

fn parse_project_id(raw: &str) -> Result<ProjectId, String> {
    non_empty(raw).map(ProjectId::parse)
}

fn parse_task_id(raw: &str) -> Result<TaskId, String> {
    non_empty(raw).map(TaskId::parse)
}

fn non_empty(raw: &str) -> Result<&str, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err("id must not be empty".to_string())
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("manager_id=3").unwrap(),
            ("manager_id".to_string(), "3".to_string())
        );
        assert_eq!(
            parse_pair("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=3").is_err());
    }

    #[test]
    fn test_parse_role_is_strict() {
        assert_eq!(parse_role("Manager").unwrap(), UserRole::Manager);
        assert!(parse_role("owner").is_err());
    }

    #[test]
    fn test_set_status_parses_label() {
        let cli = Cli::try_parse_from(["workpulse", "tasks", "set-status", "7", "in-progress"])
            .unwrap();
        match cli.command {
            Command::Tasks {
                command: TasksCommand::SetStatus { id, status },
            } => {
                assert_eq!(id, TaskId::from_number(7));
                assert_eq!(status, TaskStatus::InProgress);
            }
            _ => panic!("unexpected command"),
        }
        assert!(
            Cli::try_parse_from(["workpulse", "tasks", "set-status", "7", "someday"]).is_err()
        );
    }

    #[test]
    fn test_assign_collects_users() {
        let cli = Cli::try_parse_from([
            "workpulse", "projects", "assign", "1", "--user", "10", "--user", "11",
        ])
        .unwrap();
        match cli.command {
            Command::Projects {
                command: ProjectsCommand::Assign { id, users },
            } => {
                assert_eq!(id, ProjectId::from_number(1));
                assert_eq!(users, vec![UserId::from_number(10), UserId::from_number(11)]);
            }
            _ => panic!("unexpected command"),
        }
    }
}
