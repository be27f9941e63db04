// src/utils/format.rs
use chrono::{DateTime, Utc};

const UNITS: [(i64, &str); 5] = [
    (31_536_000, "year"),
    (2_592_000, "month"),
    (86_400, "day"),
    (3_600, "hour"),
    (60, "minute"),
];

/// Coarse "N units ago" label for record timestamps. Future times read as "just now".
pub fn format_time_ago(time: DateTime<Utc>) -> String {
    let seconds = Utc::now().signed_duration_since(time).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let (unit_secs, unit) = UNITS
        .iter()
        .copied()
        .find(|(unit_secs, _)| seconds >= *unit_secs)
        .unwrap_or((60, "minute"));
    let count = seconds / unit_secs;
    format!("{} {}{} ago", count, unit, if count == 1 { "" } else { "s" })
}

// Truncate a string if it's too long
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Hide a secret behind a fixed-width mask.
pub fn mask_password(_password: &str) -> String {
    "••••••••".to_string()
}
