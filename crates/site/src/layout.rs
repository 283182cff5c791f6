//! Layout shell shared by every page: header navigation and footer.
//!
//! The footer needs the active business info and social links. Those are
//! read through the layout cache on [`AppState`](crate::state::AppState) and
//! turned into a [`Shell`] per request.

use frontier_core::{BusinessInfo, SocialLinks};

use crate::db::{Db, RepositoryError, SettingsRepository};

const DEFAULT_ADDRESS: &str = "Wilmington, NC";
const DEFAULT_PHONE: &str = "(910) 338-9258";
const DEFAULT_EMAIL: &str = "frontierestateservices@gmail.com";

/// Header entries in display order: `(href, label)`.
const NAV: [(&str, &str); 4] = [
    ("/", "Home"),
    ("/sales", "Upcoming Sales"),
    ("/about", "About"),
    ("/contact", "Contact"),
];

/// Cached layout data.
#[derive(Debug, Clone, Default)]
pub struct LayoutData {
    pub business_info: Option<BusinessInfo>,
    pub social_links: Option<SocialLinks>,
}

impl LayoutData {
    /// Read the active settings rows with the anonymous key.
    ///
    /// # Errors
    ///
    /// Returns the first failing query's error.
    pub async fn load(db: Db<'_>) -> Result<Self, RepositoryError> {
        let settings = SettingsRepository::new(db);
        let (business_info, social_links) =
            tokio::join!(settings.active_business_info(), settings.active_social_links());

        Ok(Self {
            business_info: business_info?,
            social_links: social_links?,
        })
    }
}

/// One header link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// One footer social icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialIcon {
    pub name: &'static str,
    pub url: String,
}

/// Everything the base template needs.
#[derive(Debug, Clone)]
pub struct Shell {
    pub nav: Vec<NavLink>,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub socials: Vec<SocialIcon>,
}

impl Shell {
    /// Build the shell for a page at `current_path`.
    #[must_use]
    pub fn new(data: &LayoutData, current_path: &str) -> Self {
        let nav = NAV
            .iter()
            .map(|&(href, label)| NavLink {
                href,
                label,
                active: href == current_path,
            })
            .collect();

        let (address, phone, email) = data.business_info.as_ref().map_or_else(
            || {
                (
                    DEFAULT_ADDRESS.to_string(),
                    DEFAULT_PHONE.to_string(),
                    DEFAULT_EMAIL.to_string(),
                )
            },
            |info| (info.address.clone(), info.phone.clone(), info.email.clone()),
        );

        let socials = data
            .social_links
            .as_ref()
            .map(|links| {
                [
                    ("Facebook", &links.facebook),
                    ("Instagram", &links.instagram),
                    ("LinkedIn", &links.linkedin),
                ]
                .into_iter()
                .filter_map(|(name, url)| {
                    url.as_ref().map(|url| SocialIcon {
                        name,
                        url: url.clone(),
                    })
                })
                .collect()
            })
            .unwrap_or_default();

        Self {
            nav,
            address,
            phone,
            email,
            socials,
        }
    }
}
