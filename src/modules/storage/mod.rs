//! Storage module for persisted application state
//!
//! Provides a key-value store whose values are JSON text, either kept in
//! memory or written through to a single JSON file on disk.

mod local_store;

pub use local_store::{LocalStore, StoreError};
