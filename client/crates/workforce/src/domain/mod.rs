//! Domain Layer
//!
//! Workforce records, value objects, functional-unit grouping, and the
//! repository traits.

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;

// Re-exports
pub use entities::{AssignedUser, Project, ProjectDraft, Task, UserDraft, UserRecord};
pub use repository::{
    ActivityRepository, LocalActivityRepository, LocalProjectRepository, LocalUserRepository,
    ProjectRepository, UserRepository,
};
pub use services::{FunctionalUnit, UNASSIGNED_UNIT, UnitLead, ensure_role, group_units, visible_units};
pub use value_objects::{QueryParams, TaskStatus};
