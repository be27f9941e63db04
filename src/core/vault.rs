// src/core/vault.rs
use uuid::Uuid;

use crate::core::auth::{AuthManager, AuthState, Result as AuthResult};
use crate::core::config::Config;
use crate::models::{PasswordRecord, RecordFilter, RecordInput};
use crate::storage::{Storage, StorageError};

pub struct Vault {
    storage: Storage,
    pub auth_manager: AuthManager,
}

impl Vault {
    pub fn new(storage: Storage, config: &Config) -> Self {
        Self {
            storage,
            auth_manager: AuthManager::new(config),
        }
    }

    /// Open the configured storage and run the authentication startup step.
    pub fn open(config: &Config) -> AuthResult<Self> {
        let storage = Storage::open(config.storage_backend, &config.data_dir)?;
        let mut vault = Self::new(storage, config);
        vault.auth_manager.initialize(&vault.storage)?;
        log::info!("Vault opened with {} storage", vault.storage.get_backend_type());
        Ok(vault)
    }

    pub fn state(&self) -> AuthState {
        self.auth_manager.state()
    }

    pub fn has_master_password(&self) -> bool {
        self.auth_manager.has_master_password()
    }

    pub fn is_unlocked(&self) -> bool {
        self.auth_manager.is_authenticated()
    }

    pub fn setup_master_password(&mut self, password: &str, confirm: &str) -> AuthResult<()> {
        self.auth_manager.setup_master_password(&self.storage, password, confirm)
    }

    pub fn unlock(&mut self, master_password: &str) -> AuthResult<()> {
        self.auth_manager.login(&self.storage, master_password)
    }

    pub fn lock(&mut self) {
        self.auth_manager.logout();
    }

    pub fn change_master_password(&mut self, current: &str, new_password: &str, confirm: &str) -> AuthResult<()> {
        self.auth_manager.change_master_password(&self.storage, current, new_password, confirm)
    }

    pub fn list(&self) -> AuthResult<Vec<PasswordRecord>> {
        self.auth_manager.require_authenticated()?;
        Ok(self.storage.get_all()?)
    }

    pub fn search(&self, filter: &RecordFilter) -> AuthResult<Vec<PasswordRecord>> {
        let records = self.list()?;
        Ok(records.into_iter().filter(|r| filter.matches(r)).collect())
    }

    pub fn get(&self, id: Uuid) -> AuthResult<PasswordRecord> {
        self.list()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| StorageError::NotFound(id).into())
    }

    pub fn add(&self, input: RecordInput) -> AuthResult<PasswordRecord> {
        self.auth_manager.require_authenticated()?;
        let record = self.storage.add(checked(input)?)?;
        log::info!("Added record {}", record.id);
        Ok(record)
    }

    pub fn update(&self, id: Uuid, input: RecordInput) -> AuthResult<()> {
        self.auth_manager.require_authenticated()?;
        if !self.storage.update(id, checked(input)?)? {
            return Err(StorageError::NotFound(id).into());
        }
        log::info!("Updated record {}", id);
        Ok(())
    }

    pub fn delete(&self, id: Uuid) -> AuthResult<()> {
        self.auth_manager.require_authenticated()?;
        if !self.storage.delete(id)? {
            return Err(StorageError::NotFound(id).into());
        }
        log::info!("Deleted record {}", id);
        Ok(())
    }

    /// Resolve a full id or a unique prefix of one, as printed by `list`.
    pub fn resolve_id(&self, id_or_prefix: &str) -> AuthResult<Uuid> {
        if let Ok(id) = Uuid::parse_str(id_or_prefix) {
            return Ok(id);
        }

        let needle = id_or_prefix.trim().to_lowercase();
        let matches: Vec<Uuid> = self.list()?
            .iter()
            .map(|r| r.id)
            .filter(|id| !needle.is_empty() && id.to_string().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(StorageError::UnknownId(id_or_prefix.to_string()).into()),
            _ => Err(StorageError::AmbiguousId(id_or_prefix.to_string()).into()),
        }
    }
}

fn checked(input: RecordInput) -> Result<RecordInput, StorageError> {
    let input = input.normalized();
    match input.missing_field() {
        Some(reason) => Err(StorageError::InvalidRecord(reason)),
        None => Ok(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::AuthError;
    use crate::storage::StorageType;

    fn test_config(dir: &std::path::Path, backend: StorageType) -> Config {
        Config {
            storage_backend: backend,
            data_dir: dir.to_path_buf(),
            kdf_memory_cost: 8,
            kdf_time_cost: 1,
            kdf_parallelism: 1,
            ..Config::default()
        }
    }

    fn input(title: &str, username: &str) -> RecordInput {
        RecordInput {
            title: title.to_string(),
            username: Some(username.to_string()),
            password: "s3cret!".to_string(),
            url: None,
            notes: Some(String::new()),
        }
    }

    fn unlocked_vault(dir: &std::path::Path, backend: StorageType) -> Vault {
        let mut vault = Vault::open(&test_config(dir, backend)).unwrap();
        vault.setup_master_password("master password", "master password").unwrap();
        vault
    }

    #[test]
    fn locked_vault_refuses_record_access() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(&test_config(dir.path(), StorageType::JsonFile)).unwrap();
        assert_eq!(vault.state(), AuthState::AwaitingLogin);
        assert!(matches!(vault.list(), Err(AuthError::NotAuthenticated)));
        assert!(matches!(vault.add(input("Mail", "me")), Err(AuthError::NotAuthenticated)));
    }

    #[test]
    fn crud_through_the_vault() {
        let dir = tempfile::tempdir().unwrap();
        let vault = unlocked_vault(dir.path(), StorageType::Local);

        let mail = vault.add(input("Mail", "alice")).unwrap();
        assert_eq!(mail.notes, None);
        vault.add(input("Bank", "bob")).unwrap();

        let found = vault.search(&RecordFilter { text: Some("ALICE".to_string()) }).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, mail.id);

        vault.update(mail.id, input("Webmail", "alice")).unwrap();
        assert_eq!(vault.get(mail.id).unwrap().title, "Webmail");

        vault.delete(mail.id).unwrap();
        assert!(matches!(vault.get(mail.id), Err(AuthError::StorageError(StorageError::NotFound(_)))));
        assert!(matches!(vault.delete(mail.id), Err(AuthError::StorageError(StorageError::NotFound(_)))));
        assert_eq!(vault.list().unwrap().len(), 1);
    }

    #[test]
    fn records_survive_lock_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut vault = unlocked_vault(dir.path(), StorageType::JsonFile);
            vault.add(input("Mail", "alice")).unwrap();
            vault.lock();
            assert!(vault.list().is_err());
        }

        let mut reopened = Vault::open(&test_config(dir.path(), StorageType::JsonFile)).unwrap();
        assert!(reopened.has_master_password());
        assert!(reopened.unlock("wrong password").is_err());
        reopened.unlock("master password").unwrap();
        assert!(reopened.is_unlocked());
        assert_eq!(reopened.list().unwrap().len(), 1);
    }

    #[test]
    fn resolve_id_accepts_unique_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let vault = unlocked_vault(dir.path(), StorageType::JsonFile);
        let record = vault.add(input("Mail", "alice")).unwrap();

        let full = record.id.to_string();
        assert_eq!(vault.resolve_id(&full).unwrap(), record.id);
        assert_eq!(vault.resolve_id(&full[..8]).unwrap(), record.id);
        assert!(vault.resolve_id("").is_err());
    }

    #[test]
    fn resolve_id_errors_name_the_input() {
        let dir = tempfile::tempdir().unwrap();
        let vault = unlocked_vault(dir.path(), StorageType::JsonFile);

        match vault.resolve_id("zzzz") {
            Err(AuthError::StorageError(StorageError::UnknownId(prefix))) => assert_eq!(prefix, "zzzz"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }

        // Add records until two ids share a first hex digit
        let mut seen = std::collections::HashMap::new();
        let shared = loop {
            let record = vault.add(input("Site", "user")).unwrap();
            let first = record.id.to_string()[..1].to_string();
            if seen.insert(first.clone(), record.id).is_some() {
                break first;
            }
        };
        let err = vault.resolve_id(&shared).unwrap_err();
        assert!(matches!(err, AuthError::StorageError(StorageError::AmbiguousId(_))));
        assert!(err.to_string().contains(&format!("'{}'", shared)));
    }

    #[test]
    fn blank_title_or_empty_password_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let vault = unlocked_vault(dir.path(), StorageType::JsonFile);

        let blank_title = RecordInput { title: "   ".to_string(), ..input("x", "alice") };
        assert!(matches!(
            vault.add(blank_title),
            Err(AuthError::StorageError(StorageError::InvalidRecord(_)))
        ));

        let empty_password = RecordInput { password: String::new(), ..input("Mail", "alice") };
        assert!(matches!(
            vault.add(empty_password),
            Err(AuthError::StorageError(StorageError::InvalidRecord(_)))
        ));
        assert!(vault.list().unwrap().is_empty());

        let record = vault.add(input("Mail", "alice")).unwrap();
        let cleared = RecordInput { title: " ".to_string(), ..input("Mail", "alice") };
        assert!(vault.update(record.id, cleared).is_err());
        assert_eq!(vault.get(record.id).unwrap().title, "Mail");
    }
}
