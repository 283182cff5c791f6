//! Core types for the estate-sale site.
//!
//! This module provides type-safe wrappers for the five content tables and
//! the small value types they are built from.

pub mod email;
pub mod id;
pub mod image;
pub mod message;
pub mod sale;
pub mod settings;
pub mod status;
pub mod team;

pub use email::{Email, EmailError};
pub use id::*;
pub use image::{SALE_PLACEHOLDER_IMAGE, TEAM_MEMBER_PLACEHOLDER_IMAGE, image_or_placeholder};
pub use message::{ContactMessage, NewContactMessage};
pub use sale::{Sale, SaleDraft};
pub use settings::{BusinessInfo, BusinessInfoDraft, SocialLinks, SocialLinksDraft};
pub use status::{SaleStatus, SaleStatusError};
pub use team::{TeamMember, TeamMemberDraft};

/// Submitted field values checked before any write.
pub trait Draft {
    /// Name of the first required field left blank, if any.
    fn first_blank_field(&self) -> Option<&'static str>;
}

/// Collapse blank optional text to `None`.
///
/// Forms submit empty strings for untouched optional inputs; the remote
/// store keeps those columns `null`.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(String::new())), None);
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(
            non_blank(Some(" https://x.test/a.jpg ".to_string())),
            Some("https://x.test/a.jpg".to_string())
        );
    }
}
