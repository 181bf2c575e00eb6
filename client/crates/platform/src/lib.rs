//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the client:
//! - Environment-driven configuration
//! - HTTP transport to the REST backend (reqwest)
//! - Durable key-value storage for session material
//! - Best-effort signalling to the desktop companion process
//! - Secret handling (zeroized on drop) and credential fingerprints for logs

pub mod bridge;
pub mod config;
pub mod crypto;
pub mod secret;
pub mod storage;
pub mod transport;
