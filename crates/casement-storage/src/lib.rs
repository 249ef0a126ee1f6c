//! Casement Storage Layer
//!
//! Durable key/value persistence for shell state. Values are JSON documents
//! stored under string keys; the SQLite-backed [`Database`] is the on-disk
//! target and [`MemoryStore`] serves tests and ephemeral profiles.

mod database;
mod error;
mod memory;
mod migrations;
mod store;

pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStore;
pub use store::KeyValueStore;

pub type Result<T> = std::result::Result<T, StorageError>;
