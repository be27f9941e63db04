// src/core/auth.rs
use std::fmt;
use chrono::Utc;
use thiserror::Error;
use base64::Engine;
use rand::RngCore;
use rand::rngs::OsRng;

// For master password hashing and verification
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::SaltString;

use crate::core::config::Config;
use crate::models::MasterPasswordData;
use crate::storage::{Storage, StorageError};

const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication has not been initialized")]
    NotInitialized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("A master password is already set")]
    AlreadySet,

    #[error("No master password has been set")]
    NotSet,

    #[error("Vault is locked")]
    NotAuthenticated,

    #[error("Master password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Passwords do not match")]
    Mismatch,

    #[error("Too many failed attempts, restart to try again")]
    TooManyAttempts,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// Session state. Moves only through explicit calls on `AuthManager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unset,
    AwaitingLogin,
    Authenticated,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::Unset => write!(f, "unset"),
            AuthState::AwaitingLogin => write!(f, "awaiting login"),
            AuthState::Authenticated => write!(f, "authenticated"),
        }
    }
}

pub struct AuthManager {
    state: AuthState,
    has_master: bool,
    failed_attempts: usize,
    max_failed_attempts: usize,
    min_password_length: usize,
    kdf_memory_cost: u32,
    kdf_time_cost: u32,
    kdf_parallelism: u32,
}

impl AuthManager {
    pub fn new(config: &Config) -> Self {
        Self {
            state: AuthState::Unset,
            has_master: false,
            failed_attempts: 0,
            max_failed_attempts: config.max_failed_attempts,
            min_password_length: config.min_master_password_length,
            kdf_memory_cost: config.kdf_memory_cost,
            kdf_time_cost: config.kdf_time_cost,
            kdf_parallelism: config.kdf_parallelism,
        }
    }

    /// Startup step: record whether a master password exists and start
    /// waiting for login or first-time setup.
    pub fn initialize(&mut self, storage: &Storage) -> Result<()> {
        self.has_master = storage.load_master()?.is_some();
        self.state = AuthState::AwaitingLogin;
        log::info!(
            "Authentication initialized ({})",
            if self.has_master { "master password present" } else { "first-time setup required" }
        );
        Ok(())
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn has_master_password(&self) -> bool {
        self.has_master
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    pub fn require_authenticated(&self) -> Result<()> {
        match self.state {
            AuthState::Authenticated => Ok(()),
            AuthState::Unset => Err(AuthError::NotInitialized),
            AuthState::AwaitingLogin => Err(AuthError::NotAuthenticated),
        }
    }

    /// First-time setup. Stores the verifier and unlocks the session.
    pub fn setup_master_password(&mut self, storage: &Storage, password: &str, confirm: &str) -> Result<()> {
        self.require_initialized()?;
        if self.has_master {
            return Err(AuthError::AlreadySet);
        }

        self.check_new_password(password, confirm)?;
        let data = self.hash_master_password(password)?;
        storage.save_master(&data)?;

        self.has_master = true;
        self.state = AuthState::Authenticated;
        log::info!("Master password created");
        Ok(())
    }

    pub fn login(&mut self, storage: &Storage, password: &str) -> Result<()> {
        self.require_initialized()?;

        if self.max_failed_attempts > 0 && self.failed_attempts >= self.max_failed_attempts {
            log::warn!("Login refused after {} failed attempts", self.failed_attempts);
            return Err(AuthError::TooManyAttempts);
        }

        let data = storage.load_master()?.ok_or(AuthError::NotSet)?;

        if !Self::verify(&data, password)? {
            self.failed_attempts += 1;
            log::warn!("Failed login attempt {}", self.failed_attempts);
            return Err(AuthError::InvalidCredentials);
        }

        self.failed_attempts = 0;
        self.state = AuthState::Authenticated;
        log::info!("Vault unlocked");
        Ok(())
    }

    pub fn logout(&mut self) {
        if self.state == AuthState::Authenticated {
            self.state = AuthState::AwaitingLogin;
            log::info!("Vault locked");
        }
    }

    pub fn change_master_password(
        &mut self,
        storage: &Storage,
        current: &str,
        new_password: &str,
        confirm: &str,
    ) -> Result<()> {
        self.require_authenticated()?;

        let data = storage.load_master()?.ok_or(AuthError::NotSet)?;
        if !Self::verify(&data, current)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.check_new_password(new_password, confirm)?;
        let data = self.hash_master_password(new_password)?;
        storage.save_master(&data)?;

        log::info!("Master password changed");
        Ok(())
    }

    fn require_initialized(&self) -> Result<()> {
        match self.state {
            AuthState::Unset => Err(AuthError::NotInitialized),
            _ => Ok(()),
        }
    }

    fn check_new_password(&self, password: &str, confirm: &str) -> Result<()> {
        if password.chars().count() < self.min_password_length {
            return Err(AuthError::PasswordTooShort(self.min_password_length));
        }
        if password != confirm {
            return Err(AuthError::Mismatch);
        }
        Ok(())
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = argon2::Params::new(
            self.kdf_memory_cost,
            self.kdf_time_cost,
            self.kdf_parallelism,
            None,
        )
        .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params))
    }

    fn hash_master_password(&self, password: &str) -> Result<MasterPasswordData> {
        let mut salt_bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt_bytes);

        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        let password_hash = self.argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(MasterPasswordData {
            password_hash: password_hash.to_string(),
            salt: base64::engine::general_purpose::STANDARD.encode(salt_bytes),
            created_at: Utc::now(),
        })
    }

    // Parameters come from the stored PHC string; the comparison is constant-time.
    fn verify(data: &MasterPasswordData, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&data.password_hash)
            .map_err(|e| AuthError::HashingError(format!("Invalid hash format: {}", e)))?;

        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }
}
