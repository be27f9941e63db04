// src/generators/presets.rs
use std::fmt;
use std::str::FromStr;

use super::password::GenerationConfig;

/// Named generator configurations offered alongside the default one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPreset {
    Simple,
    Standard,
    Strong,
    Numeric,
}

impl PasswordPreset {
    pub const ALL: [PasswordPreset; 4] = [
        PasswordPreset::Simple,
        PasswordPreset::Standard,
        PasswordPreset::Strong,
        PasswordPreset::Numeric,
    ];

    pub fn config(self) -> GenerationConfig {
        let defaults = GenerationConfig::default();
        match self {
            PasswordPreset::Simple => GenerationConfig {
                length: 8,
                include_symbols: false,
                exclude_similar: true,
                ..defaults
            },
            PasswordPreset::Standard => GenerationConfig {
                length: 12,
                ..defaults
            },
            PasswordPreset::Strong => GenerationConfig {
                length: 20,
                exclude_similar: true,
                ..defaults
            },
            PasswordPreset::Numeric => GenerationConfig {
                length: 6,
                include_uppercase: false,
                include_lowercase: false,
                include_numbers: true,
                include_symbols: false,
                ..defaults
            },
        }
    }
}

impl fmt::Display for PasswordPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordPreset::Simple => write!(f, "simple"),
            PasswordPreset::Standard => write!(f, "standard"),
            PasswordPreset::Strong => write!(f, "strong"),
            PasswordPreset::Numeric => write!(f, "numeric"),
        }
    }
}

impl FromStr for PasswordPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(PasswordPreset::Simple),
            "standard" => Ok(PasswordPreset::Standard),
            "strong" => Ok(PasswordPreset::Strong),
            "numeric" => Ok(PasswordPreset::Numeric),
            other => Err(format!(
                "unknown preset '{}' (expected simple, standard, strong or numeric)",
                other
            )),
        }
    }
}
