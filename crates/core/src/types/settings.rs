//! Singleton settings rows: business contact details and social links.
//!
//! Both tables keep at most one row with `is_active = true`; that row is the
//! one the site renders.

use serde::{Deserialize, Serialize};

use super::{BusinessInfoId, Draft, SocialLinksId};

/// Business contact details (`business_info` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub id: BusinessInfoId,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub is_active: bool,
}

/// Submitted business contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct BusinessInfoDraft {
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Draft for BusinessInfoDraft {
    fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("address", &self.address),
            ("phone", &self.phone),
            ("email", &self.email),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Social network profile links (`social_links` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub id: SocialLinksId,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    pub is_active: bool,
}

impl SocialLinks {
    /// True when at least one network link is set.
    #[must_use]
    pub const fn has_any(&self) -> bool {
        self.facebook.is_some() || self.instagram.is_some() || self.linkedin.is_some()
    }
}

/// Submitted social links; every link is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct SocialLinksDraft {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
}

impl Draft for SocialLinksDraft {
    fn first_blank_field(&self) -> Option<&'static str> {
        None
    }
}
