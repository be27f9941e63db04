// src/cli/menu.rs
use std::collections::HashSet;
use std::error::Error;
use inquire::{Confirm, Select, Text};
use uuid::Uuid;

use crate::cli::handlers::{describe_classes, describe_composition, print_record, print_strength, prompt_hidden};
use crate::core::auth::AuthError;
use crate::core::config::Config;
use crate::core::vault::Vault;
use crate::generators::{
    estimate_entropy, estimate_strength_with, GenerationConfig, PasswordGenerator, PasswordPreset,
};
use crate::models::{PasswordRecord, RecordFilter, RecordInput};
use crate::utils::{mask_password, truncate_string};

const ADD: &str = "➕  Add a new password";
const VIEW: &str = "📋  View saved passwords";
const SEARCH: &str = "🔍  Search passwords";
const EDIT: &str = "✏️  Edit password";
const DELETE: &str = "🗑️  Delete password";
const GENERATE: &str = "🔐  Generate secure password";
const CHANGE_MASTER: &str = "🔁  Change master password";
const LOGOUT: &str = "🔒  Lock vault";
const EXIT: &str = "❌  Exit";

pub fn run_cli_menu(vault: &mut Vault, config: &Config) -> Result<(), Box<dyn Error>> {
    println!("╔══════════════════════════════════════╗");
    println!("║          🔐 PASSKEEPER VAULT          ║");
    println!("╚══════════════════════════════════════╝");

    loop {
        if !vault.is_unlocked() && !authenticate(vault)? {
            return Ok(());
        }

        // Ids whose password is currently shown in clear text; view state only
        let mut revealed: HashSet<Uuid> = HashSet::new();

        loop {
            let options = vec![ADD, VIEW, SEARCH, EDIT, DELETE, GENERATE, CHANGE_MASTER, LOGOUT, EXIT];
            let selection = Select::new("Choose an option:", options)
                .with_help_message("Use arrow keys to navigate, Enter to select, Esc to exit.")
                .with_page_size(12)
                .prompt_skippable()?;

            let result = match selection {
                Some(ADD) => add_password(vault, config),
                Some(VIEW) => view_passwords(vault, &mut revealed, None),
                Some(SEARCH) => {
                    let query = Text::new("Search for:").prompt()?;
                    view_passwords(vault, &mut revealed, Some(RecordFilter { text: Some(query) }))
                }
                Some(EDIT) => edit_password(vault, config),
                Some(DELETE) => delete_password(vault),
                Some(GENERATE) => generate_password(vault, config),
                Some(CHANGE_MASTER) => change_master(vault),
                Some(LOGOUT) => {
                    vault.lock();
                    println!("🔒 Vault locked.");
                    break;
                }
                Some(_) | None => {
                    vault.lock();
                    println!("👋 Goodbye!");
                    return Ok(());
                }
            };

            if let Err(e) = result {
                println!("❌ {}", e);
            }
        }
    }
}

// Login or first-time setup. Returns false when the user gives up.
fn authenticate(vault: &mut Vault) -> Result<bool, Box<dyn Error>> {
    loop {
        let result = if vault.has_master_password() {
            let password = prompt_hidden("Enter your master password:")?;
            vault.unlock(&password)
        } else {
            println!("🔐 First-time setup: Creating your master password");
            let password = prompt_hidden("🔐 Create your master password:")?;
            let confirm = prompt_hidden("🔁 Confirm your master password:")?;
            vault.setup_master_password(&password, &confirm)
        };

        match result {
            Ok(()) => {
                println!("✅ Vault unlocked");
                return Ok(true);
            }
            Err(AuthError::TooManyAttempts) => {
                println!("❌ {}", AuthError::TooManyAttempts);
                return Ok(false);
            }
            Err(e) => {
                println!("❌ {}", e);
                let retry = Confirm::new("Try again?").with_default(true).prompt()?;
                if !retry {
                    return Ok(false);
                }
            }
        }
    }
}

fn add_password(vault: &Vault, config: &Config) -> Result<(), Box<dyn Error>> {
    let title = Text::new("Title:").prompt()?;
    if title.trim().is_empty() {
        println!("❗ A title is required.");
        return Ok(());
    }
    let username = Text::new("Username or email (optional):").prompt()?;
    let url = Text::new("URL (optional):").prompt()?;

    let generate = Confirm::new("Generate a secure password?")
        .with_default(false)
        .prompt()?;

    let generated = if generate { choose_generated(config)? } else { None };
    let password = match generated {
        Some(password) => password,
        None => prompt_hidden("Enter password:")?,
    };

    let notes = Text::new("Notes (optional):").prompt()?;

    vault.add(RecordInput {
        title,
        username: Some(username),
        password,
        url: Some(url),
        notes: Some(notes),
    })?;
    println!("✅ Password added successfully!");
    Ok(())
}

fn view_passwords(vault: &Vault, revealed: &mut HashSet<Uuid>, filter: Option<RecordFilter>) -> Result<(), Box<dyn Error>> {
    let records = match &filter {
        Some(filter) => vault.search(filter)?,
        None => vault.list()?,
    };

    if records.is_empty() {
        println!("❗ No matching passwords.");
        return Ok(());
    }

    loop {
        let labels: Vec<String> = records.iter().map(|r| list_label(r, revealed.contains(&r.id))).collect();
        let selection = Select::new("Select an entry (Esc to go back):", labels.clone())
            .with_page_size(20)
            .prompt_skippable()?;

        let index = match selection.and_then(|s| labels.iter().position(|l| *l == s)) {
            Some(index) => index,
            None => return Ok(()),
        };

        let record = &records[index];
        print_record(record, revealed.contains(&record.id));

        let toggle = Confirm::new(if revealed.contains(&record.id) { "Hide password?" } else { "Show password?" })
            .with_default(false)
            .prompt()?;
        if toggle && !revealed.remove(&record.id) {
            revealed.insert(record.id);
        }
    }
}

fn edit_password(vault: &Vault, config: &Config) -> Result<(), Box<dyn Error>> {
    let record = match pick_record(vault, "Select an entry to edit:")? {
        Some(record) => record,
        None => return Ok(()),
    };

    let title = Text::new("Title:").with_default(&record.title).prompt()?;
    let username = Text::new("Username or email:")
        .with_default(record.username.as_deref().unwrap_or(""))
        .prompt()?;
    let url = Text::new("URL:").with_default(record.url.as_deref().unwrap_or("")).prompt()?;

    let change = Select::new("Password:", vec!["Keep current", "Enter new", "Generate new"]).prompt()?;
    let password = match change {
        "Enter new" => prompt_hidden("Enter new password:")?,
        "Generate new" => choose_generated(config)?.unwrap_or_else(|| record.password.clone()),
        _ => record.password.clone(),
    };

    let notes = Text::new("Notes:").with_default(record.notes.as_deref().unwrap_or("")).prompt()?;

    vault.update(record.id, RecordInput {
        title,
        username: Some(username),
        password,
        url: Some(url),
        notes: Some(notes),
    })?;
    println!("✅ Password updated successfully!");
    Ok(())
}

fn delete_password(vault: &Vault) -> Result<(), Box<dyn Error>> {
    let record = match pick_record(vault, "Select an entry to delete:")? {
        Some(record) => record,
        None => return Ok(()),
    };

    let confirmed = Confirm::new(&format!("Are you sure you want to delete '{}'?", record.title))
        .with_default(false)
        .prompt()?;

    if confirmed {
        vault.delete(record.id)?;
        println!("✅ Password deleted successfully!");
    }
    Ok(())
}

fn generate_password(vault: &Vault, config: &Config) -> Result<(), Box<dyn Error>> {
    let password = match choose_generated(config)? {
        Some(password) => password,
        None => return Ok(()),
    };

    let save = Confirm::new("Save this password?").with_default(false).prompt()?;
    if save {
        let title = Text::new("Title:").prompt()?;
        let username = Text::new("Username or email (optional):").prompt()?;
        let url = Text::new("URL (optional):").prompt()?;
        vault.add(RecordInput {
            title,
            username: Some(username),
            password,
            url: Some(url),
            notes: None,
        })?;
        println!("✅ Password saved successfully!");
    }
    Ok(())
}

fn change_master(vault: &mut Vault) -> Result<(), Box<dyn Error>> {
    let current = prompt_hidden("Current master password:")?;
    let new_password = prompt_hidden("🔐 New master password:")?;
    let confirm = prompt_hidden("🔁 Confirm new master password:")?;
    vault.change_master_password(&current, &new_password, &confirm)?;
    println!("✅ Master password changed");
    Ok(())
}

// Ask for generator options, show the result with its strength, and
// return it if the user accepts.
fn choose_generated(config: &Config) -> Result<Option<String>, Box<dyn Error>> {
    let mut choices: Vec<String> = vec!["custom".to_string()];
    choices.extend(PasswordPreset::ALL.iter().map(|p| p.to_string()));

    let choice = Select::new("Generator preset:", choices).prompt()?;
    let generation = match choice.parse::<PasswordPreset>() {
        Ok(preset) => preset.config(),
        Err(_) => prompt_generation_config(config)?,
    };
    generation.validate()?;

    let generator = PasswordGenerator::new();
    let report = estimate_strength_with(&generation, config.strength_policy);
    let entropy = estimate_entropy(&generation);

    loop {
        let password = generator.generate_password(&generation);
        println!("\nGenerated password: {}", password);
        println!("Classes: {}", describe_classes(&generation));
        println!("Contains: {}", describe_composition(&password, &generation));
        print_strength(&report, entropy);

        let action = Select::new("Use this password?", vec!["Use it", "Regenerate", "Cancel"]).prompt()?;
        match action {
            "Use it" => return Ok(Some(password)),
            "Regenerate" => continue,
            _ => return Ok(None),
        }
    }
}

fn prompt_generation_config(config: &Config) -> Result<GenerationConfig, Box<dyn Error>> {
    let length: usize = Text::new("Password length:")
        .with_default(&config.default_password_length.to_string())
        .prompt()
        .and_then(|s| s.trim().parse().map_err(|_| inquire::InquireError::Custom("Invalid number".into())))?;

    let include_uppercase = Confirm::new("Include uppercase letters?").with_default(true).prompt()?;
    let include_lowercase = Confirm::new("Include lowercase letters?").with_default(true).prompt()?;
    let include_numbers = Confirm::new("Include numbers?").with_default(true).prompt()?;
    let include_symbols = Confirm::new("Include symbols?").with_default(true).prompt()?;

    let custom_symbols = if include_symbols {
        Text::new("Symbols to use:")
            .with_default(&GenerationConfig::default().custom_symbols)
            .prompt()?
    } else {
        GenerationConfig::default().custom_symbols
    };

    let exclude_similar = Confirm::new("Exclude similar characters (I, O, l, 0, 1)?")
        .with_default(false)
        .prompt()?;

    Ok(GenerationConfig {
        length,
        include_uppercase,
        include_lowercase,
        include_numbers,
        include_symbols,
        exclude_similar,
        custom_symbols,
    })
}

fn pick_record(vault: &Vault, message: &str) -> Result<Option<PasswordRecord>, Box<dyn Error>> {
    let records = vault.list()?;
    if records.is_empty() {
        println!("❗ No passwords stored yet.");
        return Ok(None);
    }

    let labels: Vec<String> = records.iter().map(|r| list_label(r, false)).collect();
    let selection = Select::new(message, labels.clone()).with_page_size(20).prompt_skippable()?;

    Ok(selection
        .and_then(|s| labels.iter().position(|l| *l == s))
        .map(|index| records[index].clone()))
}

fn list_label(record: &PasswordRecord, reveal: bool) -> String {
    let id = record.id.to_string();
    let password = if reveal { record.password.clone() } else { mask_password(&record.password) };
    format!(
        "[{}] {} ({}) {}",
        &id[..8],
        truncate_string(&record.title, 30),
        record.username.as_deref().unwrap_or("-"),
        password,
    )
}
