// src/cli/commands.rs
use clap::{Args as ClapArgs, Subcommand};

use crate::generators::{GenerationConfig, PasswordPreset};

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Generate one or more passwords
    Generate {
        #[command(flatten)]
        options: GeneratorArgs,

        /// Number of passwords to generate
        #[arg(long, short = 'n', default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        count: u64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report strength and entropy of a generator configuration
    Strength {
        #[command(flatten)]
        options: GeneratorArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the named generator presets
    Presets,

    /// Set the master password for a new vault
    Init,

    /// List stored passwords
    List,

    /// Search titles, usernames and urls
    Search {
        /// Text to look for
        #[arg(required = true)]
        query: String,
    },

    /// Show one stored password
    Show {
        /// Record ID or unique prefix
        #[arg(required = true)]
        id: String,

        /// Print the password in clear text
        #[arg(long)]
        reveal: bool,
    },

    /// Add a password
    Add {
        #[command(flatten)]
        fields: RecordArgs,

        /// Generate the password instead of prompting for it
        #[arg(long)]
        generate: bool,

        #[command(flatten)]
        options: GeneratorArgs,
    },

    /// Update a stored password
    Update {
        /// Record ID or unique prefix
        #[arg(required = true)]
        id: String,

        #[command(flatten)]
        fields: RecordArgs,

        /// Prompt for a new password
        #[arg(long, conflicts_with = "generate")]
        new_password: bool,

        /// Replace the password with a generated one
        #[arg(long)]
        generate: bool,

        #[command(flatten)]
        options: GeneratorArgs,
    },

    /// Delete a stored password
    Delete {
        /// Record ID or unique prefix
        #[arg(required = true)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Change the master password
    ChangeMaster,
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct RecordArgs {
    /// Title of the entry
    #[arg(long, short)]
    pub title: Option<String>,

    /// Username or email
    #[arg(long, short)]
    pub username: Option<String>,

    /// Website address
    #[arg(long)]
    pub url: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct GeneratorArgs {
    /// Start from a named preset (simple, standard, strong, numeric)
    #[arg(long, short)]
    pub preset: Option<PasswordPreset>,

    /// Password length
    #[arg(long, short)]
    pub length: Option<usize>,

    /// Leave out uppercase letters
    #[arg(long)]
    pub no_uppercase: bool,

    /// Leave out lowercase letters
    #[arg(long)]
    pub no_lowercase: bool,

    /// Leave out digits
    #[arg(long)]
    pub no_numbers: bool,

    /// Leave out symbols
    #[arg(long)]
    pub no_symbols: bool,

    /// Drop look-alike characters (I, O, l, 0, 1)
    #[arg(long)]
    pub exclude_similar: bool,

    /// Symbol alphabet to draw from
    #[arg(long)]
    pub symbols: Option<String>,
}

impl GeneratorArgs {
    /// Build the generator configuration: preset (or defaults with the
    /// configured length), then the explicit flags.
    pub fn to_config(&self, default_length: usize) -> GenerationConfig {
        let mut config = match self.preset {
            Some(preset) => preset.config(),
            None => GenerationConfig {
                length: default_length,
                ..GenerationConfig::default()
            },
        };

        if let Some(length) = self.length {
            config.length = length;
        }
        if self.no_uppercase {
            config.include_uppercase = false;
        }
        if self.no_lowercase {
            config.include_lowercase = false;
        }
        if self.no_numbers {
            config.include_numbers = false;
        }
        if self.no_symbols {
            config.include_symbols = false;
        }
        if self.exclude_similar {
            config.exclude_similar = true;
        }
        if let Some(symbols) = &self.symbols {
            config.custom_symbols = symbols.clone();
        }

        config
    }
}
