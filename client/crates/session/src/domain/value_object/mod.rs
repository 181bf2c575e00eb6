//! Value Object Module

pub mod credential;
pub mod session_status;
pub mod user_role;
