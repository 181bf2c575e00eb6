//! Application Layer
//!
//! State containers over the repositories. Each one publishes its state
//! through a `watch` channel.

pub mod admin;
pub mod employee;
pub mod manager;
pub mod projects;
pub mod state;
pub mod teams;

pub use admin::{AdminState, AdminStore};
pub use employee::{EmployeeState, EmployeeStore};
pub use manager::{ManagerState, ManagerStore};
pub use projects::{ProjectState, ProjectStore};
pub use state::{LoadStatus, Tracked};
pub use teams::{TeamDirectory, TeamState};
