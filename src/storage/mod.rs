// src/storage/mod.rs
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{MasterPasswordData, PasswordRecord, RecordInput};

pub mod json_file;
pub mod local;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Local store error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("No record matches id '{0}'")]
    UnknownId(String),

    #[error("Id prefix '{0}' matches more than one record")]
    AmbiguousId(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(&'static str),

    #[error("Stored data is unreadable: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

// Record store backend - implemented by each storage type.
// Backends only load and save whole collections; the CRUD contract
// is built on top of that.
pub trait StorageBackend {
    fn load_records(&self) -> Result<Vec<PasswordRecord>>;

    fn save_records(&self, records: &[PasswordRecord]) -> Result<()>;

    fn load_master(&self) -> Result<Option<MasterPasswordData>>;

    fn save_master(&self, data: &MasterPasswordData) -> Result<()>;

    fn get_all(&self) -> Result<Vec<PasswordRecord>> {
        self.load_records()
    }

    fn add(&self, input: RecordInput) -> Result<PasswordRecord> {
        let mut records = self.load_records()?;
        let record = PasswordRecord::new(input);
        records.push(record.clone());
        self.save_records(&records)?;
        Ok(record)
    }

    /// Returns `false` when no record has the given id.
    fn update(&self, id: Uuid, input: RecordInput) -> Result<bool> {
        let mut records = self.load_records()?;
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => record.apply(input),
            None => return Ok(false),
        }
        self.save_records(&records)?;
        Ok(true)
    }

    /// Returns `false` when no record has the given id.
    fn delete(&self, id: Uuid) -> Result<bool> {
        let mut records = self.load_records()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save_records(&records)?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// `passwords.json` and `master.json` in the data directory.
    JsonFile,
    /// Single-file key-value store.
    Local,
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "file" => Ok(StorageType::JsonFile),
            "local" | "sqlite" => Ok(StorageType::Local),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::JsonFile => write!(f, "json"),
            StorageType::Local => write!(f, "local"),
        }
    }
}

// Enum to hold the selected backend implementation
pub enum StorageKind {
    JsonFile(json_file::JsonFileBackend),
    Local(local::LocalStoreBackend),
}

pub struct Storage {
    pub backend: StorageKind,
}

impl Storage {
    pub fn open(storage_type: StorageType, data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let backend = match storage_type {
            StorageType::JsonFile => StorageKind::JsonFile(json_file::JsonFileBackend::new(data_dir)),
            StorageType::Local => StorageKind::Local(local::LocalStoreBackend::open(&data_dir.join(local::DB_FILE))?),
        };
        log::debug!("Opened {} storage in {}", storage_type, data_dir.display());
        Ok(Self { backend })
    }

    fn inner(&self) -> &dyn StorageBackend {
        match &self.backend {
            StorageKind::JsonFile(backend) => backend,
            StorageKind::Local(backend) => backend,
        }
    }

    pub fn get_backend_type(&self) -> StorageType {
        match &self.backend {
            StorageKind::JsonFile(_) => StorageType::JsonFile,
            StorageKind::Local(_) => StorageType::Local,
        }
    }

    pub fn get_all(&self) -> Result<Vec<PasswordRecord>> {
        self.inner().get_all()
    }

    pub fn add(&self, input: RecordInput) -> Result<PasswordRecord> {
        self.inner().add(input)
    }

    pub fn update(&self, id: Uuid, input: RecordInput) -> Result<bool> {
        self.inner().update(id, input)
    }

    pub fn delete(&self, id: Uuid) -> Result<bool> {
        self.inner().delete(id)
    }

    pub fn load_master(&self) -> Result<Option<MasterPasswordData>> {
        self.inner().load_master()
    }

    pub fn save_master(&self, data: &MasterPasswordData) -> Result<()> {
        self.inner().save_master(data)
    }
}
