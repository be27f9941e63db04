// src/storage/json_file.rs
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use chrono::Utc;
use tempfile::NamedTempFile;

use super::{Result, StorageBackend, StorageError};
use crate::models::{MasterPasswordData, PasswordRecord};

pub const PASSWORDS_FILE: &str = "passwords.json";
pub const MASTER_FILE: &str = "master.json";

pub struct JsonFileBackend {
    passwords_path: PathBuf,
    master_path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            passwords_path: data_dir.join(PASSWORDS_FILE),
            master_path: data_dir.join(MASTER_FILE),
        }
    }

    // A missing file is an empty store
    fn read_optional(path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace `path` in one step: write a sibling temp file, then rename it over.
    fn write_atomic(path: &Path, content: &str) -> Result<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Move an unreadable file aside so the next save cannot overwrite it.
    fn quarantine(path: &Path) -> Result<PathBuf> {
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%d%H%M%S%3f")));
        let target = PathBuf::from(name);
        fs::rename(path, &target)?;
        Ok(target)
    }
}

impl StorageBackend for JsonFileBackend {
    fn load_records(&self) -> Result<Vec<PasswordRecord>> {
        let content = match Self::read_optional(&self.passwords_path)? {
            Some(content) => content,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str(&content) {
            Ok(records) => Ok(records),
            Err(e) => {
                let moved = Self::quarantine(&self.passwords_path)?;
                log::error!(
                    "Unreadable {} ({}), moved to {}; starting with an empty list",
                    self.passwords_path.display(),
                    e,
                    moved.display()
                );
                Ok(Vec::new())
            }
        }
    }

    fn save_records(&self, records: &[PasswordRecord]) -> Result<()> {
        Self::write_atomic(&self.passwords_path, &serde_json::to_string_pretty(records)?)
    }

    fn load_master(&self) -> Result<Option<MasterPasswordData>> {
        let content = match Self::read_optional(&self.master_path)? {
            Some(content) => content,
            None => return Ok(None),
        };

        // Treating this as "no master password" would reopen first-time setup
        serde_json::from_str(&content).map(Some).map_err(|e| {
            StorageError::Corrupt(format!(
                "{} ({}); restore it from a backup or remove it to reset the master password",
                self.master_path.display(),
                e
            ))
        })
    }

    fn save_master(&self, data: &MasterPasswordData) -> Result<()> {
        Self::write_atomic(&self.master_path, &serde_json::to_string_pretty(data)?)
    }
}
