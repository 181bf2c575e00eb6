//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of the client's vocabulary:
//! - The unified error type and its HTTP status classification
//! - Typed identifiers for backend records
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across every client crate.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
