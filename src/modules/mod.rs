//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the persistent store and the client for the remote user directory.

pub mod remote_sync;
pub mod storage;
