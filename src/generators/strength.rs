// src/generators/strength.rs
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use super::charset::CharClass;
use super::password::GenerationConfig;

pub const FEEDBACK_TOO_SHORT: &str = "password length should be at least 8 characters";
pub const FEEDBACK_FEW_TYPES: &str = "use at least 3 different character types";
pub const FEEDBACK_WEAK: &str = "password strength is low; increase length or character variety";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthLevel::Weak => write!(f, "weak"),
            StrengthLevel::Medium => write!(f, "medium"),
            StrengthLevel::Strong => write!(f, "strong"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthReport {
    pub score: f64,
    pub level: StrengthLevel,
    pub feedback: Vec<String>,
}

/// How character classes are counted when scoring a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrengthPolicy {
    /// Every `include*` flag that is set earns a point, even a symbol
    /// class with no custom symbols.
    #[default]
    Parity,
    /// Only classes the generator can actually draw from earn a point.
    UsableClasses,
}

impl FromStr for StrengthPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parity" | "flags" => Ok(StrengthPolicy::Parity),
            "usable" | "usable-classes" | "usable_classes" => Ok(StrengthPolicy::UsableClasses),
            other => Err(format!("unknown strength policy '{}'", other)),
        }
    }
}

/// Score a configuration with the default policy.
pub fn estimate_strength(config: &GenerationConfig) -> StrengthReport {
    estimate_strength_with(config, StrengthPolicy::default())
}

pub fn estimate_strength_with(config: &GenerationConfig, policy: StrengthPolicy) -> StrengthReport {
    let mut score = 0.0;
    let mut feedback = Vec::new();

    if config.length >= 8 {
        score += 1.0;
    } else {
        feedback.push(FEEDBACK_TOO_SHORT.to_string());
    }
    if config.length >= 12 {
        score += 1.0;
    }
    if config.length >= 16 {
        score += 1.0;
    }

    let char_type_count = match policy {
        StrengthPolicy::Parity => CharClass::ALL.iter().filter(|class| config.includes(**class)).count(),
        StrengthPolicy::UsableClasses => config.usable_classes().len(),
    };
    score += char_type_count as f64;

    if char_type_count < 3 {
        feedback.push(FEEDBACK_FEW_TYPES.to_string());
    }

    if config.exclude_similar {
        score += 0.5;
    }

    let level = if score <= 3.0 {
        feedback.push(FEEDBACK_WEAK.to_string());
        StrengthLevel::Weak
    } else if score <= 5.0 {
        StrengthLevel::Medium
    } else {
        StrengthLevel::Strong
    };

    StrengthReport { score, level, feedback }
}

/// Size of the search space a configuration draws from, in bits.
///
/// This is `length * log2(charset size)`, a property of the policy rather
/// than of any generated password. Symbols count `custom_symbols` as given.
pub fn estimate_entropy(config: &GenerationConfig) -> f64 {
    let symbols = config.symbol_chars();
    let char_set_size: usize = CharClass::ALL
        .iter()
        .filter(|class| config.includes(**class))
        .map(|class| class.alphabet_size(config.exclude_similar, &symbols))
        .sum();

    if char_set_size == 0 {
        return 0.0;
    }

    config.length as f64 * (char_set_size as f64).log2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::PasswordPreset;

    fn config(length: usize, upper: bool, lower: bool, numbers: bool, symbols: bool, custom: &str) -> GenerationConfig {
        GenerationConfig {
            length,
            include_uppercase: upper,
            include_lowercase: lower,
            include_numbers: numbers,
            include_symbols: symbols,
            exclude_similar: false,
            custom_symbols: custom.to_string(),
        }
    }

    #[test]
    fn all_classes_long_password_is_strong() {
        let config = config(16, true, true, true, true, "!@#$");
        let report = estimate_strength(&config);
        assert_eq!(report.score, 7.0);
        assert_eq!(report.level, StrengthLevel::Strong);
        assert!(report.feedback.is_empty());

        let entropy = estimate_entropy(&config);
        assert!((entropy - 16.0 * 66f64.log2()).abs() < 1e-9);
        // 16 * log2(66) is 96.71 bits
        assert!((entropy - 96.71).abs() < 0.01);
    }

    #[test]
    fn numeric_preset_is_weak_with_all_feedback() {
        let report = estimate_strength(&PasswordPreset::Numeric.config());
        assert_eq!(report.score, 1.0);
        assert_eq!(report.level, StrengthLevel::Weak);
        assert_eq!(report.feedback, vec![
            FEEDBACK_TOO_SHORT.to_string(),
            FEEDBACK_FEW_TYPES.to_string(),
            FEEDBACK_WEAK.to_string(),
        ]);
    }

    #[test]
    fn level_thresholds() {
        // 8 chars + two classes = 3
        assert_eq!(estimate_strength(&config(8, true, true, false, false, "")).level, StrengthLevel::Weak);
        // 3.5 is medium
        let mut cfg = config(8, true, true, false, false, "");
        cfg.exclude_similar = true;
        let report = estimate_strength(&cfg);
        assert_eq!(report.score, 3.5);
        assert_eq!(report.level, StrengthLevel::Medium);
        // 12 chars + three classes = 5
        assert_eq!(estimate_strength(&config(12, true, true, true, false, "")).level, StrengthLevel::Medium);
        // 5.5 is strong
        let mut cfg = config(12, true, true, true, false, "");
        cfg.exclude_similar = true;
        assert_eq!(estimate_strength(&cfg).level, StrengthLevel::Strong);
    }

    #[test]
    fn presets_score_as_expected() {
        assert_eq!(estimate_strength(&PasswordPreset::Simple.config()).score, 4.5);
        assert_eq!(estimate_strength(&PasswordPreset::Standard.config()).score, 6.0);
        assert_eq!(estimate_strength(&PasswordPreset::Strong.config()).score, 7.5);
    }

    #[test]
    fn strength_is_deterministic() {
        let config = config(10, true, false, true, true, "#");
        assert_eq!(estimate_strength(&config), estimate_strength(&config));
    }

    #[test]
    fn empty_symbols_still_score_under_parity() {
        let config = config(16, true, true, true, true, "");
        assert_eq!(estimate_strength(&config).score, 7.0);
        let usable = estimate_strength_with(&config, StrengthPolicy::UsableClasses);
        assert_eq!(usable.score, 6.0);
        assert_eq!(usable.level, StrengthLevel::Strong);
    }

    #[test]
    fn usable_policy_flags_missing_variety() {
        let config = config(16, false, false, true, true, "");
        let report = estimate_strength_with(&config, StrengthPolicy::UsableClasses);
        assert_eq!(report.score, 4.0);
        assert!(report.feedback.contains(&FEEDBACK_FEW_TYPES.to_string()));
    }

    #[test]
    fn entropy_is_zero_without_a_charset() {
        assert_eq!(estimate_entropy(&config(16, false, false, false, false, "")), 0.0);
        assert_eq!(estimate_entropy(&config(16, false, false, false, true, "")), 0.0);
    }

    #[test]
    fn entropy_uses_reduced_alphabets() {
        let mut cfg = config(10, true, true, true, false, "");
        cfg.exclude_similar = true;
        let expected = 10.0 * ((24 + 25 + 8) as f64).log2();
        assert!((estimate_entropy(&cfg) - expected).abs() < 1e-9);
    }

    #[test]
    fn symbol_entropy_counts_duplicates() {
        let mut cfg = config(4, false, false, false, true, "!!!!");
        cfg.exclude_similar = true;
        assert!((estimate_entropy(&cfg) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn entropy_is_monotonic() {
        let mut previous = 0.0;
        for length in 1..=64 {
            let entropy = estimate_entropy(&config(length, true, false, true, false, ""));
            assert!(entropy >= previous);
            previous = entropy;
        }

        let fewer = estimate_entropy(&config(12, true, false, false, false, ""));
        let more = estimate_entropy(&config(12, true, true, false, false, ""));
        let most = estimate_entropy(&config(12, true, true, true, true, "!"));
        assert!(fewer <= more && more <= most);
    }

    #[test]
    fn entropy_does_not_overflow_for_long_passwords() {
        let entropy = estimate_entropy(&config(5000, true, true, true, true, "!@#"));
        assert!(entropy.is_finite());
    }

    #[test]
    fn policy_parses_from_str() {
        assert_eq!("parity".parse::<StrengthPolicy>(), Ok(StrengthPolicy::Parity));
        assert_eq!("Usable".parse::<StrengthPolicy>(), Ok(StrengthPolicy::UsableClasses));
        assert!("other".parse::<StrengthPolicy>().is_err());
    }

    #[test]
    fn level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&StrengthLevel::Medium).unwrap(), "\"medium\"");
    }
}
