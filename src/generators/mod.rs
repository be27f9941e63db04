// src/generators/mod.rs
pub mod charset;
pub mod password;
pub mod presets;
pub mod strength;

pub use charset::CharClass;
pub use password::{GenerationConfig, GeneratorError, PasswordGenerator};
pub use presets::PasswordPreset;
pub use strength::{estimate_entropy, estimate_strength, estimate_strength_with, StrengthLevel, StrengthPolicy, StrengthReport};
