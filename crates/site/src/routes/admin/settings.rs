//! Business info and social links panels.

use axum::{Form, extract::State, response::Redirect};
use frontier_core::{BusinessInfoDraft, Draft, Email, SocialLinksDraft, non_blank};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use super::{DASHBOARD_PATH, failed, saved};
use crate::db::SettingsRepository;
use crate::middleware::RequireAdminSession;
use crate::state::AppState;

const BUSINESS_INFO_UPDATED: &str = "Business information updated successfully";
const BUSINESS_INFO_ERROR: &str = "Error updating business information";
const SOCIAL_LINKS_UPDATED: &str = "Social links updated successfully";
const SOCIAL_LINKS_ERROR: &str = "Error updating social links";

/// Business info form data.
#[derive(Debug, Deserialize)]
pub struct BusinessInfoForm {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl BusinessInfoForm {
    fn into_draft(self) -> Result<BusinessInfoDraft, String> {
        let draft = BusinessInfoDraft {
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
        };
        if let Some(field) = draft.first_blank_field() {
            return Err(format!("{field} is required"));
        }
        let email = Email::parse(&draft.email).map_err(|e| e.to_string())?;
        Ok(BusinessInfoDraft {
            email: email.into_inner(),
            ..draft
        })
    }
}

/// Social links form data; blank inputs clear the link.
#[derive(Debug, Deserialize)]
pub struct SocialLinksForm {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
}

impl SocialLinksForm {
    fn into_draft(self) -> Result<SocialLinksDraft, String> {
        let draft = SocialLinksDraft {
            facebook: non_blank(self.facebook),
            instagram: non_blank(self.instagram),
            linkedin: non_blank(self.linkedin),
        };
        for (name, link) in [
            ("facebook", &draft.facebook),
            ("instagram", &draft.instagram),
            ("linkedin", &draft.linkedin),
        ] {
            if let Some(link) = link {
                Url::parse(link).map_err(|e| format!("{name} link is not a valid URL ({e})"))?;
            }
        }
        Ok(draft)
    }
}

/// Replace the active business info.
///
/// POST /admin/business-info
#[instrument(skip(admin, state, session))]
pub async fn update_business_info(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<BusinessInfoForm>,
) -> Redirect {
    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(reason) => {
            return failed(&session, format!("{BUSINESS_INFO_ERROR}: {reason}"), DASHBOARD_PATH)
                .await;
        }
    };

    match SettingsRepository::new(state.admin_db(&admin.access_token))
        .replace_business_info(&draft)
        .await
    {
        Ok(info) => {
            tracing::info!(id = %info.id, "Business info updated");
            state.invalidate_layout().await;
            saved(&session, BUSINESS_INFO_UPDATED, DASHBOARD_PATH).await
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to update business info");
            failed(&session, BUSINESS_INFO_ERROR, DASHBOARD_PATH).await
        }
    }
}

/// Replace the active social links.
///
/// POST /admin/social-links
#[instrument(skip(admin, state, session))]
pub async fn update_social_links(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SocialLinksForm>,
) -> Redirect {
    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(reason) => {
            return failed(&session, format!("{SOCIAL_LINKS_ERROR}: {reason}"), DASHBOARD_PATH)
                .await;
        }
    };

    match SettingsRepository::new(state.admin_db(&admin.access_token))
        .replace_social_links(&draft)
        .await
    {
        Ok(links) => {
            tracing::info!(id = %links.id, "Social links updated");
            state.invalidate_layout().await;
            saved(&session, SOCIAL_LINKS_UPDATED, DASHBOARD_PATH).await
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to update social links");
            failed(&session, SOCIAL_LINKS_ERROR, DASHBOARD_PATH).await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_business_info_requires_every_field() {
        let form = BusinessInfoForm {
            address: "Wilmington, NC".to_string(),
            phone: "  ".to_string(),
            email: "owner@frontier.example".to_string(),
        };
        assert_eq!(form.into_draft().unwrap_err(), "phone is required");
    }

    #[test]
    fn test_business_info_normalises_email() {
        let form = BusinessInfoForm {
            address: " Wilmington, NC ".to_string(),
            phone: "(910) 338-9258".to_string(),
            email: "Owner@Frontier.Example".to_string(),
        };
        let draft = form.into_draft().unwrap();
        assert_eq!(draft.address, "Wilmington, NC");
        assert_eq!(draft.email, "owner@frontier.example");
    }

    #[test]
    fn test_business_info_rejects_bad_email() {
        let form = BusinessInfoForm {
            address: "Wilmington, NC".to_string(),
            phone: "(910) 338-9258".to_string(),
            email: "owner-at-frontier".to_string(),
        };
        assert!(form.into_draft().is_err());
    }

    #[test]
    fn test_social_links_blank_clears_link() {
        let form = SocialLinksForm {
            facebook: Some("https://facebook.com/frontier".to_string()),
            instagram: Some("   ".to_string()),
            linkedin: None,
        };
        let draft = form.into_draft().unwrap();
        assert_eq!(
            draft.facebook.as_deref(),
            Some("https://facebook.com/frontier")
        );
        assert!(draft.instagram.is_none());
        assert!(draft.linkedin.is_none());
    }

    #[test]
    fn test_social_links_reject_non_urls() {
        let form = SocialLinksForm {
            facebook: None,
            instagram: Some("frontier on instagram".to_string()),
            linkedin: None,
        };
        assert!(form.into_draft().unwrap_err().starts_with("instagram"));
    }
}
