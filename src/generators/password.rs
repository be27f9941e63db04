// src/generators/password.rs
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use super::charset::{CharClass, DEFAULT_SYMBOLS, DIGITS};

/// Upper bound accepted at the input boundary. `generate` itself has no limit.
pub const MAX_LENGTH: usize = 4096;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Password length must be between 1 and {max}, got {got}")]
    InvalidLength { got: usize, max: usize },
}

// Password generation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    pub length: usize,
    pub include_uppercase: bool,
    pub include_lowercase: bool,
    pub include_numbers: bool,
    pub include_symbols: bool,
    pub exclude_similar: bool,
    pub custom_symbols: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            length: 16,
            include_uppercase: true,
            include_lowercase: true,
            include_numbers: true,
            include_symbols: true,
            exclude_similar: false,
            custom_symbols: DEFAULT_SYMBOLS.to_string(),
        }
    }
}

impl GenerationConfig {
    /// Reject lengths the generator should never be handed from untrusted input.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.length == 0 || self.length > MAX_LENGTH {
            return Err(GeneratorError::InvalidLength { got: self.length, max: MAX_LENGTH });
        }
        Ok(())
    }

    pub fn symbol_chars(&self) -> Vec<char> {
        self.custom_symbols.chars().collect()
    }

    /// Whether the `include*` flag for `class` is set.
    pub fn includes(&self, class: CharClass) -> bool {
        match class {
            CharClass::Uppercase => self.include_uppercase,
            CharClass::Lowercase => self.include_lowercase,
            CharClass::Digit => self.include_numbers,
            CharClass::Symbol => self.include_symbols,
        }
    }

    /// Selected classes with a non-empty alphabet, in evaluation order.
    pub fn usable_classes(&self) -> Vec<CharClass> {
        let symbols = self.symbol_chars();
        CharClass::ALL
            .into_iter()
            .filter(|class| self.includes(*class))
            .filter(|class| class.alphabet_size(self.exclude_similar, &symbols) > 0)
            .collect()
    }
}

pub struct PasswordGenerator;

impl PasswordGenerator {
    pub fn new() -> Self {
        PasswordGenerator
    }

    /// Generate one password using the thread-local CSPRNG.
    pub fn generate_password(&self, config: &GenerationConfig) -> String {
        let mut rng = rand::thread_rng();
        generate_with_rng(config, &mut rng)
    }

    pub fn generate_many(&self, config: &GenerationConfig, count: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| generate_with_rng(config, &mut rng)).collect()
    }
}

/// Build a password that contains one character from every usable class,
/// fills the rest from the combined pool and shuffles the result.
///
/// When `length` is smaller than the number of usable classes the required
/// characters are truncated in evaluation order, so trailing classes may be
/// missing. An empty pool falls back to plain digits.
pub fn generate_with_rng<R: Rng + ?Sized>(config: &GenerationConfig, rng: &mut R) -> String {
    let symbols = config.symbol_chars();
    let mut pool: Vec<char> = Vec::new();
    let mut password: Vec<char> = Vec::with_capacity(config.length);

    for class in config.usable_classes() {
        let alphabet = class.alphabet(config.exclude_similar, &symbols);
        password.push(alphabet[rng.gen_range(0..alphabet.len())]);
        pool.extend(alphabet);
    }

    if pool.is_empty() {
        pool.extend(DIGITS.chars());
    }

    while password.len() < config.length {
        password.push(pool[rng.gen_range(0..pool.len())]);
    }

    password.truncate(config.length);
    password.shuffle(rng);

    password.into_iter().collect()
}
