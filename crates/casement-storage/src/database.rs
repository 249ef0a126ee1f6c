//! SQLite connection and settings slots

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::store::KeyValueStore;
use crate::Result;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;

        // WAL keeps readers off the writer's lock during window-close saves
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        run_migrations(&conn)?;

        tracing::debug!(path = %path.as_ref().display(), "Opened settings database");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            let value = conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, updated_at],
            )?;
            Ok(())
        })
    }
}

impl KeyValueStore for Database {
    fn get_value(&self, key: &str) -> Result<Option<Value>> {
        match self.get_setting(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_value(&self, key: &str, value: &Value) -> Result<()> {
        let serialized = serde_json::to_string(value)?;
        self.set_setting(key, &serialized)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            let count: i32 =
                conn.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;
            assert_eq!(count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_json_slots() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_value("saved_tabs").unwrap(), None);

        let tabs = json!([{"url": "https://example.com", "title": "Example"}]);
        db.set_value("saved_tabs", &tabs).unwrap();
        assert_eq!(db.get_value("saved_tabs").unwrap(), Some(tabs));

        db.set_value("saved_tabs", &json!([])).unwrap();
        assert_eq!(db.get_or("saved_tabs", json!(null)).unwrap(), json!([]));
    }

    #[test]
    fn test_corrupt_slot_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting("saved_tabs", "{not json").unwrap();
        assert!(db.get_value("saved_tabs").is_err());
    }

    #[test]
    fn test_open_on_disk_persists() {
        let path = std::env::temp_dir().join(format!(
            "casement-storage-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        {
            let db = Database::open(&path).unwrap();
            db.set_value("theme", &json!("dark")).unwrap();
        }

        let reopened = Database::open(&path).unwrap();
        assert_eq!(reopened.get_value("theme").unwrap(), Some(json!("dark")));

        drop(reopened);
        let _ = std::fs::remove_file(&path);
    }
}
