//! Messages submitted through the public contact form (`contact_messages` table).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContactMessageId, Draft, Email};

/// A contact message as stored remotely.
///
/// `read` only ever moves from `false` to `true`; the row is otherwise
/// immutable until deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

/// A message about to be inserted by the contact form.
///
/// `read` is always written as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub message: String,
    read: bool,
}

impl NewContactMessage {
    /// Build an unread message.
    #[must_use]
    pub fn new(name: String, email: Email, phone: Option<String>, message: String) -> Self {
        Self {
            name,
            email,
            phone,
            message,
            read: false,
        }
    }
}

impl Draft for NewContactMessage {
    fn first_blank_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.message.trim().is_empty() {
            Some("message")
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_is_unread() {
        let msg = NewContactMessage::new(
            "Pat".to_string(),
            Email::parse("pat@example.com").unwrap(),
            None,
            "Do you buy pianos?".to_string(),
        );
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["read"], false);
        assert_eq!(value["email"], "pat@example.com");
        assert!(value["phone"].is_null());
    }

    #[test]
    fn test_blank_message_is_reported() {
        let msg = NewContactMessage::new(
            "Pat".to_string(),
            Email::parse("pat@example.com").unwrap(),
            None,
            "   ".to_string(),
        );
        assert_eq!(msg.first_blank_field(), Some("message"));
    }

    #[test]
    fn test_row_without_read_defaults_to_unread() {
        let row: ContactMessage = serde_json::from_str(
            r#"{"id":"1c6f4a0e-2b1d-4e5f-8a9b-0c1d2e3f4a5b","name":"Lee","email":"lee@example.com",
                "phone":"910-555-0100","message":"Hello","created_at":"2025-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert!(!row.read);
    }
}
