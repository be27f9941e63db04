// src/storage/local.rs
use std::path::Path;
use rusqlite::{params, Connection, OptionalExtension};

use super::{Result, StorageBackend, StorageError};
use crate::models::{MasterPasswordData, PasswordRecord};

pub const DB_FILE: &str = "local_storage.db";

const PASSWORDS_KEY: &str = "passwords";
const MASTER_KEY: &str = "masterPassword";
const CORRUPT_PASSWORDS_KEY: &str = "passwords.corrupt";

/// Key-value store holding JSON strings, one key per collection.
pub struct LocalStoreBackend {
    conn: Connection,
}

impl LocalStoreBackend {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS local_storage (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl StorageBackend for LocalStoreBackend {
    fn load_records(&self) -> Result<Vec<PasswordRecord>> {
        let stored = match self.get_item(PASSWORDS_KEY)? {
            Some(stored) => stored,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str(&stored) {
            Ok(records) => Ok(records),
            Err(e) => {
                // Keep the damaged value under a side key so the next save cannot drop it
                self.set_item(CORRUPT_PASSWORDS_KEY, &stored)?;
                log::error!(
                    "Unreadable '{}' entry ({}), copied to '{}'; starting with an empty list",
                    PASSWORDS_KEY,
                    e,
                    CORRUPT_PASSWORDS_KEY
                );
                Ok(Vec::new())
            }
        }
    }

    fn save_records(&self, records: &[PasswordRecord]) -> Result<()> {
        self.set_item(PASSWORDS_KEY, &serde_json::to_string(records)?)
    }

    fn load_master(&self) -> Result<Option<MasterPasswordData>> {
        let stored = match self.get_item(MASTER_KEY)? {
            Some(stored) => stored,
            None => return Ok(None),
        };

        serde_json::from_str(&stored)
            .map(Some)
            .map_err(|e| StorageError::Corrupt(format!("'{}' entry ({})", MASTER_KEY, e)))
    }

    fn save_master(&self, data: &MasterPasswordData) -> Result<()> {
        self.set_item(MASTER_KEY, &serde_json::to_string(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordInput;

    #[test]
    fn set_item_overwrites() {
        let store = LocalStoreBackend::open_in_memory().unwrap();
        store.set_item("k", "one").unwrap();
        store.set_item("k", "two").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.get_item("missing").unwrap(), None);
    }

    #[test]
    fn records_are_kept_under_one_key() {
        let store = LocalStoreBackend::open_in_memory().unwrap();
        store.add(RecordInput {
            title: "Wifi".to_string(),
            password: "pw".to_string(),
            ..RecordInput::default()
        }).unwrap();

        let raw = store.get_item(PASSWORDS_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("Wifi"));
    }

    #[test]
    fn corrupt_records_survive_the_next_save() {
        let store = LocalStoreBackend::open_in_memory().unwrap();
        store.set_item(PASSWORDS_KEY, "[{\"title\":\"Old\"").unwrap();

        store.add(RecordInput {
            title: "New".to_string(),
            password: "pw".to_string(),
            ..RecordInput::default()
        }).unwrap();

        let titles: Vec<String> = store.get_all().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["New".to_string()]);
        assert_eq!(
            store.get_item(CORRUPT_PASSWORDS_KEY).unwrap().as_deref(),
            Some("[{\"title\":\"Old\"")
        );
    }

    #[test]
    fn corrupt_master_is_an_error() {
        let store = LocalStoreBackend::open_in_memory().unwrap();
        store.set_item(MASTER_KEY, "oops").unwrap();
        assert!(matches!(store.load_master(), Err(StorageError::Corrupt(_))));
    }
}
