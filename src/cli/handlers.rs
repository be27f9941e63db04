// src/cli/handlers.rs
use std::error::Error;
use inquire::{Confirm, Password};
use serde_json::json;

use crate::cli::commands::{GeneratorArgs, RecordArgs};
use crate::core::config::Config;
use crate::core::vault::Vault;
use crate::generators::{
    estimate_entropy, estimate_strength_with, CharClass, GenerationConfig, PasswordGenerator, PasswordPreset, StrengthReport,
};
use crate::models::{PasswordRecord, RecordFilter, RecordInput};
use crate::utils::{format_time_ago, mask_password, truncate_string};

/// Non-interactive master password source.
pub const MASTER_PASSWORD_ENV: &str = "PASSKEEPER_MASTER_PASSWORD";

// Handlers for CLI commands

pub fn handle_generate(config: &Config, options: &GeneratorArgs, count: u64, as_json: bool) -> Result<(), Box<dyn Error>> {
    let generation = options.to_config(config.default_password_length);
    generation.validate()?;

    if count == 0 {
        return Err("count must be at least 1".into());
    }
    let passwords = PasswordGenerator::new().generate_many(&generation, usize::try_from(count)?);
    log::debug!("Generated {} password(s) of length {}", passwords.len(), generation.length);

    if as_json {
        let report = estimate_strength_with(&generation, config.strength_policy);
        let output = json!({
            "passwords": passwords,
            "config": generation,
            "strength": report,
            "entropy": estimate_entropy(&generation),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for password in passwords {
            println!("{}", password);
        }
    }

    Ok(())
}

pub fn handle_strength(config: &Config, options: &GeneratorArgs, as_json: bool) -> Result<(), Box<dyn Error>> {
    let generation = options.to_config(config.default_password_length);
    generation.validate()?;

    let report = estimate_strength_with(&generation, config.strength_policy);
    let entropy = estimate_entropy(&generation);

    if as_json {
        let output = json!({ "strength": report, "entropy": entropy });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_strength(&report, entropy);
    }

    Ok(())
}

pub fn handle_presets(config: &Config) -> Result<(), Box<dyn Error>> {
    println!("{:<10} {:>6}  {:<28} {:>8}  {}", "PRESET", "LENGTH", "CLASSES", "ENTROPY", "LEVEL");
    for preset in PasswordPreset::ALL {
        let generation = preset.config();
        let report = estimate_strength_with(&generation, config.strength_policy);
        println!(
            "{:<10} {:>6}  {:<28} {:>8.1}  {}",
            preset,
            generation.length,
            describe_classes(&generation),
            estimate_entropy(&generation),
            report.level,
        );
    }
    Ok(())
}

pub fn handle_init(vault: &mut Vault) -> Result<(), Box<dyn Error>> {
    if vault.has_master_password() {
        println!("❗ A master password is already set. Use `change-master` to replace it.");
        return Ok(());
    }

    let password = prompt_hidden("🔐 Create your master password:")?;
    let confirm = prompt_hidden("🔁 Confirm your master password:")?;
    vault.setup_master_password(&password, &confirm)?;

    println!("✅ Master password created and vault initialized");
    Ok(())
}

pub fn handle_list(vault: &mut Vault) -> Result<(), Box<dyn Error>> {
    unlock(vault)?;
    let records = vault.list()?;
    print_records(&records);
    Ok(())
}

pub fn handle_search(vault: &mut Vault, query: &str) -> Result<(), Box<dyn Error>> {
    unlock(vault)?;
    let filter = RecordFilter { text: Some(query.to_string()) };
    let records = vault.search(&filter)?;
    print_records(&records);
    Ok(())
}

pub fn handle_show(vault: &mut Vault, id: &str, reveal: bool) -> Result<(), Box<dyn Error>> {
    unlock(vault)?;
    let id = vault.resolve_id(id)?;
    let record = vault.get(id)?;
    print_record(&record, reveal);
    Ok(())
}

pub fn handle_add(
    vault: &mut Vault,
    config: &Config,
    fields: &RecordArgs,
    generate: bool,
    options: &GeneratorArgs,
) -> Result<(), Box<dyn Error>> {
    unlock(vault)?;

    let title = match &fields.title {
        Some(title) if !title.trim().is_empty() => title.clone(),
        _ => return Err("a title is required (--title)".into()),
    };

    let password = if generate {
        generated_password(config, options)?
    } else {
        prompt_hidden("Enter password:")?
    };

    let record = vault.add(RecordInput {
        title,
        username: fields.username.clone(),
        password,
        url: fields.url.clone(),
        notes: fields.notes.clone(),
    })?;

    println!("✅ Password added with id {}", record.id);
    Ok(())
}

pub fn handle_update(
    vault: &mut Vault,
    config: &Config,
    id: &str,
    fields: &RecordArgs,
    new_password: bool,
    generate: bool,
    options: &GeneratorArgs,
) -> Result<(), Box<dyn Error>> {
    unlock(vault)?;
    let id = vault.resolve_id(id)?;
    let current = vault.get(id)?;

    let password = if generate {
        generated_password(config, options)?
    } else if new_password {
        prompt_hidden("Enter new password:")?
    } else {
        current.password.clone()
    };

    let input = RecordInput {
        title: fields.title.clone().unwrap_or(current.title),
        username: fields.username.clone().or(current.username),
        password,
        url: fields.url.clone().or(current.url),
        notes: fields.notes.clone().or(current.notes),
    };

    vault.update(id, input)?;
    println!("✅ Password updated successfully!");
    Ok(())
}

pub fn handle_delete(vault: &mut Vault, id: &str, yes: bool) -> Result<(), Box<dyn Error>> {
    unlock(vault)?;
    let id = vault.resolve_id(id)?;
    let record = vault.get(id)?;

    if !yes {
        let confirmed = Confirm::new(&format!("Delete '{}'?", record.title))
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    vault.delete(id)?;
    println!("✅ Password deleted successfully!");
    Ok(())
}

pub fn handle_change_master(vault: &mut Vault) -> Result<(), Box<dyn Error>> {
    let current = unlock(vault)?;
    let new_password = prompt_hidden("🔐 New master password:")?;
    let confirm = prompt_hidden("🔁 Confirm new master password:")?;
    vault.change_master_password(&current, &new_password, &confirm)?;
    println!("✅ Master password changed");
    Ok(())
}

/// Unlock with the password from the environment, or prompt for it.
/// Returns the master password that worked.
fn unlock(vault: &mut Vault) -> Result<String, Box<dyn Error>> {
    if !vault.has_master_password() {
        return Err("no master password set yet, run `passkeeper init` first".into());
    }

    let password = match std::env::var(MASTER_PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => password,
        _ => prompt_hidden("Enter your master password:")?,
    };
    vault.unlock(&password)?;
    Ok(password)
}

fn generated_password(config: &Config, options: &GeneratorArgs) -> Result<String, Box<dyn Error>> {
    let generation = options.to_config(config.default_password_length);
    generation.validate()?;
    let password = PasswordGenerator::new().generate_password(&generation);
    let report = estimate_strength_with(&generation, config.strength_policy);
    println!(
        "Generated a {}-character password with {} (strength: {})",
        generation.length,
        describe_composition(&password, &generation),
        report.level
    );
    Ok(password)
}

pub(crate) fn prompt_hidden(message: &str) -> Result<String, inquire::InquireError> {
    Password::new(message)
        .with_display_mode(inquire::PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()
}

pub(crate) fn describe_classes(config: &GenerationConfig) -> String {
    let classes: Vec<String> = config.usable_classes().iter().map(|c| c.to_string()).collect();
    if classes.is_empty() {
        "digit (fallback)".to_string()
    } else {
        classes.join(", ")
    }
}

/// Classes that actually appear in a generated password.
pub(crate) fn describe_composition(password: &str, config: &GenerationConfig) -> String {
    let symbols = config.symbol_chars();
    let present: Vec<String> = CharClass::ALL
        .iter()
        .filter(|class| password.chars().any(|c| class.contains(c, config.exclude_similar, &symbols)))
        .map(|class| class.to_string())
        .collect();
    present.join(", ")
}

pub(crate) fn print_strength(report: &StrengthReport, entropy: f64) {
    println!("Strength: {} (score {})", report.level, report.score);
    println!("Entropy:  {:.1} bits", entropy);
    for message in &report.feedback {
        println!("  • {}", message);
    }
}

fn print_records(records: &[PasswordRecord]) {
    if records.is_empty() {
        println!("❗ No passwords stored yet.");
        return;
    }

    println!("{:<8}  {:<24}  {:<24}  {}", "ID", "TITLE", "USERNAME", "UPDATED");
    for record in records {
        let id = record.id.to_string();
        println!(
            "{:<8}  {:<24}  {:<24}  {}",
            &id[..8],
            truncate_string(&record.title, 24),
            truncate_string(record.username.as_deref().unwrap_or("-"), 24),
            format_time_ago(record.updated_at),
        );
    }
}

pub(crate) fn print_record(record: &PasswordRecord, reveal: bool) {
    println!("\n🔐 Password Details");
    println!("ID: {}", record.id);
    println!("Title: {}", record.title);
    if let Some(username) = &record.username {
        println!("Username: {}", username);
    }
    if reveal {
        println!("Password: {}", record.password);
    } else {
        println!("Password: {}", mask_password(&record.password));
    }
    if let Some(url) = &record.url {
        println!("URL: {}", url);
    }
    if let Some(notes) = &record.notes {
        println!("Notes: {}", notes);
    }
    println!("Created: {}", record.created_at);
    println!("Last updated: {} ({})", record.updated_at, format_time_ago(record.updated_at));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_classes_lists_usable_ones() {
        assert_eq!(
            describe_classes(&GenerationConfig::default()),
            "uppercase, lowercase, digit, symbol"
        );
        assert_eq!(describe_classes(&PasswordPreset::Numeric.config()), "digit");

        let empty_symbols = GenerationConfig {
            include_uppercase: false,
            include_lowercase: false,
            include_numbers: false,
            custom_symbols: String::new(),
            ..GenerationConfig::default()
        };
        assert_eq!(describe_classes(&empty_symbols), "digit (fallback)");
    }

    #[test]
    fn composition_reports_present_classes() {
        let config = GenerationConfig::default();
        assert_eq!(describe_composition("abc123", &config), "lowercase, digit");
        assert_eq!(describe_composition("A!", &config), "uppercase, symbol");
    }

    #[test]
    fn generate_rejects_zero_count() {
        assert!(handle_generate(&Config::default(), &GeneratorArgs::default(), 0, false).is_err());
    }

    #[test]
    fn unlock_hands_back_the_master_password_for_reuse() {
        use crate::storage::StorageType;

        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            storage_backend: StorageType::JsonFile,
            data_dir: dir.path().to_path_buf(),
            kdf_memory_cost: 8,
            kdf_time_cost: 1,
            kdf_parallelism: 1,
            ..Config::default()
        };
        let mut vault = Vault::open(&config).unwrap();
        vault.setup_master_password("old master pw", "old master pw").unwrap();
        vault.lock();

        std::env::set_var(MASTER_PASSWORD_ENV, "old master pw");
        let current = unlock(&mut vault).unwrap();
        std::env::remove_var(MASTER_PASSWORD_ENV);
        assert_eq!(current, "old master pw");

        vault.change_master_password(&current, "new master pw", "new master pw").unwrap();
        vault.lock();
        assert!(vault.unlock("old master pw").is_err());
        vault.unlock("new master pw").unwrap();
    }

    #[test]
    fn generate_rejects_zero_length() {
        let options = GeneratorArgs { length: Some(0), ..GeneratorArgs::default() };
        assert!(handle_generate(&Config::default(), &options, 1, false).is_err());
    }
}
