//! Estate sale listings (`sales` table).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, SALE_PLACEHOLDER_IMAGE, SaleId, SaleStatus, image_or_placeholder};

/// A sale listing as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub title: String,
    /// Free-form date range, e.g. "March 14-16, 8am-2pm".
    pub dates: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    /// Stored status text outside the known values, kept so the row can be
    /// corrected. `status` then holds the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrecognized_status: Option<String>,
}

impl Sale {
    /// Badge text: the stored value when it is not a known status.
    #[must_use]
    pub fn status_label(&self) -> &str {
        self.unrecognized_status
            .as_deref()
            .unwrap_or_else(|| self.status.label())
    }

    /// Badge colour modifier.
    #[must_use]
    pub const fn status_badge_class(&self) -> &'static str {
        if self.unrecognized_status.is_some() {
            "badge--unknown"
        } else {
            self.status.badge_class()
        }
    }

    /// Image to render for this sale.
    #[must_use]
    pub fn image_src(&self) -> &str {
        image_or_placeholder(self.image_url.as_deref(), SALE_PLACEHOLDER_IMAGE)
    }
}

/// Field values written on insert or update.
///
/// `id` and `created_at` are assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SaleDraft {
    pub title: String,
    pub dates: String,
    pub location: String,
    pub description: String,
    pub image_url: Option<String>,
    pub status: SaleStatus,
}

impl From<&Sale> for SaleDraft {
    fn from(sale: &Sale) -> Self {
        Self {
            title: sale.title.clone(),
            dates: sale.dates.clone(),
            location: sale.location.clone(),
            description: sale.description.clone(),
            image_url: sale.image_url.clone(),
            status: sale.status,
        }
    }
}

impl Draft for SaleDraft {
    fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("dates", &self.dates),
            ("location", &self.location),
            ("description", &self.description),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sale_json(image: &str) -> String {
        format!(
            r#"{{
                "id": "0b7d3c4e-8f1a-4b2c-9d3e-5f6a7b8c9d0e",
                "title": "Spring Clearance",
                "dates": "April 4-6",
                "location": "Wilmington, NC",
                "description": "Furniture and tools",
                "image_url": {image},
                "status": "upcoming",
                "created_at": "2025-03-01T14:30:00.123456+00:00"
            }}"#
        )
    }

    #[test]
    fn test_deserialize_remote_row() {
        let sale: Sale = serde_json::from_str(&sale_json("null")).unwrap();
        assert_eq!(sale.title, "Spring Clearance");
        assert_eq!(sale.status, SaleStatus::Upcoming);
        assert!(sale.image_url.is_none());
    }

    #[test]
    fn test_image_src_falls_back_to_placeholder() {
        let sale: Sale = serde_json::from_str(&sale_json("null")).unwrap();
        assert_eq!(sale.image_src(), SALE_PLACEHOLDER_IMAGE);

        let sale: Sale = serde_json::from_str(&sale_json("\"https://img.test/s.jpg\"")).unwrap();
        assert_eq!(sale.image_src(), "https://img.test/s.jpg");
    }

    #[test]
    fn test_unrecognized_status_shows_stored_text() {
        let mut sale: Sale = serde_json::from_str(&sale_json("null")).unwrap();
        assert!(sale.unrecognized_status.is_none());
        assert_eq!(sale.status_label(), "Upcoming");

        sale.unrecognized_status = Some("postponed".to_string());
        assert_eq!(sale.status_label(), "postponed");
        assert_eq!(sale.status_badge_class(), "badge--unknown");
        assert_eq!(SaleDraft::from(&sale).status, SaleStatus::Upcoming);
    }

    #[test]
    fn test_draft_reports_first_blank_field() {
        let mut draft = SaleDraft {
            title: "Estate of J. Smith".to_string(),
            dates: "May 1".to_string(),
            location: " ".to_string(),
            description: String::new(),
            image_url: None,
            status: SaleStatus::Active,
        };
        assert_eq!(draft.first_blank_field(), Some("location"));

        draft.location = "Leland".to_string();
        draft.description = "Antiques".to_string();
        assert_eq!(draft.first_blank_field(), None);
    }

    #[test]
    fn test_draft_serializes_status_and_null_image() {
        let draft = SaleDraft::default();
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["status"], "upcoming");
        assert!(value["image_url"].is_null());
    }
}
