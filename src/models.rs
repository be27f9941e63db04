// src/models.rs
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PasswordRecord {
    pub fn new(input: RecordInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            username: input.username,
            password: input.password,
            url: input.url,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields, keeping `id` and `created_at`.
    pub fn apply(&mut self, input: RecordInput) {
        self.title = input.title;
        self.username = input.username;
        self.password = input.password;
        self.url = input.url;
        self.notes = input.notes;
        self.updated_at = Utc::now();
    }
}

// Record fields supplied by the user on add or edit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordInput {
    pub title: String,
    pub username: Option<String>,
    pub password: String,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl RecordInput {
    /// Blank optional fields are stored as absent.
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        self.title = self.title.trim().to_string();
        self.username = blank_to_none(self.username);
        self.url = blank_to_none(self.url);
        self.notes = blank_to_none(self.notes);
        self
    }

    /// Title and password are required; the password is kept byte for byte.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("a title is required")
        } else if self.password.is_empty() {
            Some("a password is required")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    pub text: Option<String>,
}

impl RecordFilter {
    pub fn matches(&self, record: &PasswordRecord) -> bool {
        let needle = match &self.text {
            Some(text) if !text.trim().is_empty() => text.trim().to_lowercase(),
            _ => return true,
        };

        let contains = |field: &str| field.to_lowercase().contains(&needle);
        contains(&record.title)
            || record.username.as_deref().map_or(false, contains)
            || record.url.as_deref().map_or(false, contains)
    }
}

/// Persisted master password verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterPasswordData {
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Base64 of the per-install salt, also embedded in the PHC string.
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> RecordInput {
        RecordInput {
            title: title.to_string(),
            username: Some("alice@example.com".to_string()),
            password: "hunter2".to_string(),
            url: Some("https://mail.example.com".to_string()),
            notes: None,
        }
    }

    #[test]
    fn apply_keeps_identity() {
        let mut record = PasswordRecord::new(input("Mail"));
        let id = record.id;
        let created = record.created_at;

        record.apply(RecordInput { password: "changed".to_string(), ..input("Mail") });

        assert_eq!(record.id, id);
        assert_eq!(record.created_at, created);
        assert_eq!(record.password, "changed");
        assert!(record.updated_at >= created);
    }

    #[test]
    fn normalized_drops_blank_optionals() {
        let normalized = RecordInput {
            title: "  Bank ".to_string(),
            username: Some("   ".to_string()),
            password: "pw".to_string(),
            url: Some(String::new()),
            notes: Some("pin in safe".to_string()),
        }
        .normalized();

        assert_eq!(normalized.title, "Bank");
        assert_eq!(normalized.username, None);
        assert_eq!(normalized.url, None);
        assert_eq!(normalized.notes.as_deref(), Some("pin in safe"));
    }

    #[test]
    fn filter_matches_title_username_and_url() {
        let record = PasswordRecord::new(input("Mail"));
        let filter = |text: &str| RecordFilter { text: Some(text.to_string()) };

        assert!(RecordFilter::default().matches(&record));
        assert!(filter("MAIL").matches(&record));
        assert!(filter("alice").matches(&record));
        assert!(filter("example.com").matches(&record));
        assert!(!filter("bank").matches(&record));
    }

    #[test]
    fn record_without_optionals_deserializes() {
        let json = r#"{
            "id": "7f1d2c1e-9a57-4c1f-8a0e-0c0a4f3c2b10",
            "title": "Router",
            "password": "admin",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let record: PasswordRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "Router");
        assert_eq!(record.username, None);
    }
}
