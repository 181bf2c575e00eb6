//! Infrastructure Layer
//!
//! REST implementation of the workforce repositories.

pub mod rest;

pub use rest::RestRepository;
