//! Team member create, update and delete.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use frontier_core::{TeamMember, TeamMemberDraft, TeamMemberId, non_blank};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{delete_entity, save_entity};
use crate::components::{EntityForm, FormMode};
use crate::middleware::RequireAdminSession;
use crate::state::AppState;

/// Team member form data.
#[derive(Debug, Deserialize)]
pub struct TeamMemberForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub bio: String,
    pub image_url: Option<String>,
}

impl From<TeamMemberForm> for TeamMemberDraft {
    fn from(form: TeamMemberForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            role: form.role.trim().to_string(),
            bio: form.bio.trim().to_string(),
            image_url: non_blank(form.image_url),
        }
    }
}

/// Add a team member.
///
/// POST /admin/team
#[instrument(skip(admin, state, session))]
pub async fn create(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<TeamMemberForm>,
) -> Redirect {
    let form = EntityForm::<TeamMember>::submitted(FormMode::Create, form.into());
    save_entity(&state, &admin, &session, form).await
}

/// Update a team member.
///
/// POST /admin/team/{id}
#[instrument(skip(admin, state, session))]
pub async fn update(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<TeamMemberId>,
    Form(form): Form<TeamMemberForm>,
) -> Redirect {
    let form = EntityForm::<TeamMember>::submitted(FormMode::Edit(id), form.into());
    save_entity(&state, &admin, &session, form).await
}

/// Remove a team member.
///
/// POST /admin/team/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<TeamMemberId>,
) -> Redirect {
    delete_entity::<TeamMember>(&state, &admin, &session, id).await
}
