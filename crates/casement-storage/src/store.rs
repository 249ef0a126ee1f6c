//! Key/value contract shared by every storage backend

use serde_json::Value;

use crate::Result;

/// A durable slot store addressed by string keys.
///
/// Backends must be safe to share between the lifecycle manager and any
/// collaborator that holds a clone of the same handle.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get_value(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value stored under `key`.
    fn set_value(&self, key: &str, value: &Value) -> Result<()>;

    /// Read `key`, falling back to `default` when the slot is empty.
    fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        Ok(self.get_value(key)?.unwrap_or(default))
    }
}
