//! Sale create, update and delete.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use frontier_core::{Sale, SaleDraft, SaleId, SaleStatus, SaleStatusError, non_blank};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{delete_entity, failed, save_entity};
use crate::components::{EntityForm, FormEntity, FormMode};
use crate::middleware::RequireAdminSession;
use crate::remote::AuthSession;
use crate::state::AppState;

/// Sale form data.
///
/// `status` stays text until [`SaleForm::into_draft`] so an unknown value is
/// rejected here rather than by the form decoder.
#[derive(Debug, Deserialize)]
pub struct SaleForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl SaleForm {
    /// Field values to write.
    ///
    /// # Errors
    ///
    /// Returns `SaleStatusError` if `status` is not a known status.
    pub fn into_draft(self) -> Result<SaleDraft, SaleStatusError> {
        Ok(SaleDraft {
            status: self.status.trim().parse::<SaleStatus>()?,
            title: self.title.trim().to_string(),
            dates: self.dates.trim().to_string(),
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url: non_blank(self.image_url),
        })
    }
}

/// Create a sale.
///
/// POST /admin/sales
#[instrument(skip(admin, state, session))]
pub async fn create(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SaleForm>,
) -> Redirect {
    submit(&state, &admin, &session, FormMode::Create, form).await
}

/// Update a sale.
///
/// POST /admin/sales/{id}
#[instrument(skip(admin, state, session))]
pub async fn update(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<SaleId>,
    Form(form): Form<SaleForm>,
) -> Redirect {
    submit(&state, &admin, &session, FormMode::Edit(id), form).await
}

/// Delete a sale.
///
/// POST /admin/sales/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<SaleId>,
) -> Redirect {
    delete_entity::<Sale>(&state, &admin, &session, id).await
}

async fn submit(
    state: &AppState,
    admin: &AuthSession,
    session: &Session,
    mode: FormMode<SaleId>,
    form: SaleForm,
) -> Redirect {
    match form.into_draft() {
        Ok(draft) => {
            let form = EntityForm::<Sale>::submitted(mode, draft);
            save_entity(state, admin, session, form).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected sale with unknown status");
            failed(
                session,
                format!("{}: invalid status", Sale::SAVE_ERROR),
                &EntityForm::<Sale>::reopen_href_for(mode),
            )
            .await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(status: &str, image_url: Option<&str>) -> SaleForm {
        SaleForm {
            title: " Spring Clearance ".to_string(),
            dates: "April 4-6".to_string(),
            location: "Wilmington, NC".to_string(),
            description: "Furniture, tools and linens".to_string(),
            image_url: image_url.map(String::from),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_into_draft_parses_status_and_trims() {
        let draft = form("active", Some("  ")).into_draft().unwrap();
        assert_eq!(draft.status, SaleStatus::Active);
        assert_eq!(draft.title, "Spring Clearance");
        assert!(draft.image_url.is_none());
    }

    #[test]
    fn test_into_draft_rejects_unknown_status() {
        let err = form("postponed", None).into_draft().unwrap_err();
        assert_eq!(err, SaleStatusError("postponed".to_string()));
    }
}
