use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

mod cli;
mod core;
mod generators;
mod logging;
mod models;
mod storage;
mod utils;

use crate::cli::{Args, CliCommand};
use crate::cli::handlers;
use crate::core::config::Config;
use crate::core::vault::Vault;

fn main() -> ExitCode {
    // Load environment variables
    if Path::new(".env").exists() {
        dotenvy::dotenv().ok();
    }

    let args = Args::parse();

    let mut config = Config::load();
    args.apply(&mut config);

    if let Err(e) = logging::init(&config) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    log::debug!("Loaded config: {:?}", config);

    match run(args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, config: &Config) -> Result<(), Box<dyn Error>> {
    match args.command {
        // Generator commands never touch the vault
        Some(CliCommand::Generate { options, count, json }) => {
            handlers::handle_generate(config, &options, count, json)
        }
        Some(CliCommand::Strength { options, json }) => handlers::handle_strength(config, &options, json),
        Some(CliCommand::Presets) => handlers::handle_presets(config),

        None => cli::menu::run_cli_menu(&mut open_vault(config)?, config),
        Some(CliCommand::Init) => handlers::handle_init(&mut open_vault(config)?),
        Some(CliCommand::List) => handlers::handle_list(&mut open_vault(config)?),
        Some(CliCommand::Search { query }) => handlers::handle_search(&mut open_vault(config)?, &query),
        Some(CliCommand::Show { id, reveal }) => handlers::handle_show(&mut open_vault(config)?, &id, reveal),
        Some(CliCommand::Add { fields, generate, options }) => {
            handlers::handle_add(&mut open_vault(config)?, config, &fields, generate, &options)
        }
        Some(CliCommand::Update { id, fields, new_password, generate, options }) => handlers::handle_update(
            &mut open_vault(config)?,
            config,
            &id,
            &fields,
            new_password,
            generate,
            &options,
        ),
        Some(CliCommand::Delete { id, yes }) => handlers::handle_delete(&mut open_vault(config)?, &id, yes),
        Some(CliCommand::ChangeMaster) => handlers::handle_change_master(&mut open_vault(config)?),
    }
}

fn open_vault(config: &Config) -> Result<Vault, Box<dyn Error>> {
    log::debug!("Data directory: {}", config.data_dir.display());
    Ok(Vault::open(config)?)
}
