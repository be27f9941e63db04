// src/generators/charset.rs
use std::fmt;
use serde::{Serialize, Deserialize};

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const UPPERCASE_NO_SIMILAR: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const LOWERCASE_NO_SIMILAR: &str = "abcdefghijkmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
pub const DIGITS_NO_SIMILAR: &str = "23456789";
pub const DEFAULT_SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// A named character category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl CharClass {
    /// Evaluation order used by the generator when seeding required characters.
    pub const ALL: [CharClass; 4] = [
        CharClass::Uppercase,
        CharClass::Lowercase,
        CharClass::Digit,
        CharClass::Symbol,
    ];

    /// Resolve the alphabet for this class.
    ///
    /// Symbols are always taken verbatim from `custom_symbols`, duplicates
    /// included, and are never reduced by `exclude_similar`.
    pub fn alphabet(self, exclude_similar: bool, custom_symbols: &[char]) -> Vec<char> {
        match self {
            CharClass::Symbol => custom_symbols.to_vec(),
            _ => self.builtin(exclude_similar).chars().collect(),
        }
    }

    /// Number of entries in the resolved alphabet.
    pub fn alphabet_size(self, exclude_similar: bool, custom_symbols: &[char]) -> usize {
        match self {
            CharClass::Symbol => custom_symbols.len(),
            _ => self.builtin(exclude_similar).len(),
        }
    }

    fn builtin(self, exclude_similar: bool) -> &'static str {
        match (self, exclude_similar) {
            (CharClass::Uppercase, false) => UPPERCASE,
            (CharClass::Uppercase, true) => UPPERCASE_NO_SIMILAR,
            (CharClass::Lowercase, false) => LOWERCASE,
            (CharClass::Lowercase, true) => LOWERCASE_NO_SIMILAR,
            (CharClass::Digit, false) => DIGITS,
            (CharClass::Digit, true) => DIGITS_NO_SIMILAR,
            (CharClass::Symbol, _) => "",
        }
    }

    /// Whether `c` belongs to this class's resolved alphabet.
    pub fn contains(self, c: char, exclude_similar: bool, custom_symbols: &[char]) -> bool {
        match self {
            CharClass::Symbol => custom_symbols.contains(&c),
            _ => self.builtin(exclude_similar).contains(c),
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharClass::Uppercase => write!(f, "uppercase"),
            CharClass::Lowercase => write!(f, "lowercase"),
            CharClass::Digit => write!(f, "digit"),
            CharClass::Symbol => write!(f, "symbol"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_alphabet_sizes() {
        assert_eq!(CharClass::Uppercase.alphabet_size(false, &[]), 26);
        assert_eq!(CharClass::Uppercase.alphabet_size(true, &[]), 24);
        assert_eq!(CharClass::Lowercase.alphabet_size(false, &[]), 26);
        assert_eq!(CharClass::Lowercase.alphabet_size(true, &[]), 25);
        assert_eq!(CharClass::Digit.alphabet_size(false, &[]), 10);
        assert_eq!(CharClass::Digit.alphabet_size(true, &[]), 8);
    }

    #[test]
    fn similar_characters_are_removed() {
        let upper = CharClass::Uppercase.alphabet(true, &[]);
        assert!(!upper.contains(&'I') && !upper.contains(&'O'));
        let lower = CharClass::Lowercase.alphabet(true, &[]);
        assert!(!lower.contains(&'l'));
        let digits = CharClass::Digit.alphabet(true, &[]);
        assert!(!digits.contains(&'0') && !digits.contains(&'1'));
    }

    #[test]
    fn symbols_are_used_verbatim() {
        let custom: Vec<char> = "!!l0".chars().collect();
        assert_eq!(CharClass::Symbol.alphabet(true, &custom), custom);
        assert_eq!(CharClass::Symbol.alphabet_size(true, &custom), 4);
        assert!(CharClass::Symbol.contains('l', true, &custom));
    }
}
