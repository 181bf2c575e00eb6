//! Workforce Module
//!
//! Clean Architecture structure:
//! - `domain/` - Users, projects, tasks, functional units, repository traits
//! - `application/` - Admin, project, employee, manager and team state
//! - `infra/` - REST repository over the session's request client
//!
//! ## State Model
//! - Containers never invent figures; missing backend fields stay empty
//! - User mutations are followed by a fresh user listing
//! - Project mutations are reconciled into the local list and current project
//! - A failed operation leaves its error in state and returns it to the caller

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::{
    AdminState, AdminStore, EmployeeState, EmployeeStore, LoadStatus, ManagerState, ManagerStore,
    ProjectState, ProjectStore, TeamDirectory, TeamState,
};
pub use domain::{
    FunctionalUnit, Project, ProjectDraft, QueryParams, Task, TaskStatus, UserDraft, UserRecord,
};
pub use error::{ErrorReport, WorkforceError, WorkforceResult};
pub use infra::RestRepository;

#[cfg(test)]
mod tests;
