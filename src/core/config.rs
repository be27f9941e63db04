// src/core/config.rs
use std::env;
use std::fmt;
use std::str::FromStr;
use std::path::PathBuf;
use log::LevelFilter;

use crate::generators::StrengthPolicy;
use crate::storage::StorageType;

// Configuration for the password keeper
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub storage_backend: StorageType,
    pub data_dir: PathBuf,

    // Master password hashing (Argon2id)
    pub kdf_memory_cost: u32,
    pub kdf_time_cost: u32,
    pub kdf_parallelism: u32,

    // Authentication
    pub max_failed_attempts: usize,
    pub min_master_password_length: usize,

    // Password Generation
    pub default_password_length: usize,
    pub strength_policy: StrengthPolicy,

    // Logging
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Storage
            storage_backend: StorageType::JsonFile,
            data_dir: PathBuf::from("./data"),

            // Master password hashing
            kdf_memory_cost: 65536, // 64 MB
            kdf_time_cost: 3,
            kdf_parallelism: 4,

            // Authentication
            max_failed_attempts: 5,
            min_master_password_length: 8,

            // Password Generation
            default_password_length: 16,
            strength_policy: StrengthPolicy::Parity,

            // Logging
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl Config {
    /// Defaults, overridden by any of the recognised environment variables.
    /// Values that fail to parse are reported and skipped.
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(dir) = crate::utils::get_app_data_dir() {
            config.data_dir = dir;
        }

        override_from_env("STORAGE_BACKEND", &mut config.storage_backend);
        override_from_env("DATA_DIR", &mut config.data_dir);

        override_from_env("KDF_MEMORY_COST", &mut config.kdf_memory_cost);
        override_from_env("KDF_TIME_COST", &mut config.kdf_time_cost);
        override_from_env("KDF_PARALLELISM", &mut config.kdf_parallelism);

        override_from_env("MAX_FAILED_ATTEMPTS", &mut config.max_failed_attempts);
        override_from_env("MIN_MASTER_PASSWORD_LENGTH", &mut config.min_master_password_length);

        override_from_env("DEFAULT_PASSWORD_LENGTH", &mut config.default_password_length);
        if config.default_password_length == 0 {
            config.default_password_length = Config::default().default_password_length;
        }
        override_from_env("STRENGTH_POLICY", &mut config.strength_policy);

        override_from_env("LOG_LEVEL", &mut config.log_level);
        if let Ok(file) = env::var("LOG_FILE") {
            if !file.trim().is_empty() {
                config.log_file = Some(PathBuf::from(file));
            }
        }

        config
    }
}

// Logging is not up yet while the config loads, so problems go to stderr.
fn override_from_env<T>(key: &str, target: &mut T)
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let Ok(raw) = env::var(key) else { return };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(e) => eprintln!("Ignoring invalid {}='{}': {}", key, raw, e),
    }
}
