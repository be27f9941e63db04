// src/cli/mod.rs
use std::path::PathBuf;
use clap::Parser;

pub mod commands;
pub mod handlers;
pub mod menu;

pub use commands::{CliCommand, GeneratorArgs};

use crate::storage::StorageType;

#[derive(Parser, Debug)]
#[command(author, version, about = "Local password vault with a configurable password generator", long_about = None)]
pub struct Args {
    /// Storage backend (json or local)
    #[arg(long, short, env = "STORAGE_BACKEND")]
    pub storage: Option<StorageType>,

    /// Directory holding the vault files
    #[arg(long, env = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Command to execute; starts the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

impl Args {
    /// Apply command line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut crate::core::config::Config) {
        if let Some(storage) = self.storage {
            config.storage_backend = storage;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
    }
}
