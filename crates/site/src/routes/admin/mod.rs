//! Admin panel route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /admin                         - Dashboard (?page=N, ?sale=new|ID, ?member=new|ID)
//! GET  /admin/login                   - Login page (redirects to /admin when signed in)
//! POST /admin/login                   - Sign in (rate limited)
//! POST /admin/logout                  - Sign out
//!
//! # Settings
//! POST /admin/business-info           - Replace active business info
//! POST /admin/social-links            - Replace active social links
//!
//! # Sales
//! POST /admin/sales                   - Create sale
//! POST /admin/sales/{id}              - Update sale
//! POST /admin/sales/{id}/delete       - Delete sale
//!
//! # Team
//! POST /admin/team                    - Create team member
//! POST /admin/team/{id}               - Update team member
//! POST /admin/team/{id}/delete        - Delete team member
//!
//! # Messages
//! POST /admin/messages/{id}/read      - Mark message read
//! POST /admin/messages/{id}/delete    - Delete message
//! ```
//!
//! Every mutation redirects back to the dashboard. Success clears the
//! session's dashboard snapshot so the next visit reloads all panels; the
//! outcome is carried across the redirect as a flash.

pub mod dashboard;
pub mod login;
pub mod messages;
pub mod sales;
pub mod settings;
pub mod team;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::components::{EntityForm, FormEntity, FormError};
use crate::dashboard::DashboardSnapshot;
use crate::flash::{Flash, set_flash};
use crate::middleware::login_rate_limiter;
use crate::remote::AuthSession;
use crate::state::AppState;

/// Dashboard path.
pub const DASHBOARD_PATH: &str = "/admin";

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::show))
        .route(
            "/login",
            get(login::login_page).merge(post(login::login).layer(login_rate_limiter())),
        )
        .route("/logout", post(login::logout))
        .route("/business-info", post(settings::update_business_info))
        .route("/social-links", post(settings::update_social_links))
        .route("/sales", post(sales::create))
        .route("/sales/{id}", post(sales::update))
        .route("/sales/{id}/delete", post(sales::delete))
        .route("/team", post(team::create))
        .route("/team/{id}", post(team::update))
        .route("/team/{id}/delete", post(team::delete))
        .route("/messages/{id}/read", post(messages::mark_read))
        .route("/messages/{id}/delete", post(messages::delete))
}

/// Finish a successful mutation: flash, drop the snapshot, back to `to`.
pub(crate) async fn saved(session: &Session, message: &str, to: &str) -> Redirect {
    set_flash(session, Flash::success(message)).await;
    DashboardSnapshot::clear(session).await;
    Redirect::to(to)
}

/// Finish a failed mutation: flash the error and return to `to` with the
/// snapshot untouched.
pub(crate) async fn failed(session: &Session, message: impl Into<String>, to: &str) -> Redirect {
    set_flash(session, Flash::error(message)).await;
    Redirect::to(to)
}

/// Dashboard URL for a message page.
pub(crate) fn page_href(page: Option<usize>) -> String {
    match page {
        Some(page) if page > 1 => format!("{DASHBOARD_PATH}?page={page}"),
        _ => DASHBOARD_PATH.to_string(),
    }
}

/// Submit a sale or team member form and redirect with the outcome.
///
/// A failed save reopens the form showing the submitted values.
pub(crate) async fn save_entity<E: FormEntity>(
    state: &AppState,
    admin: &AuthSession,
    session: &Session,
    form: EntityForm<E>,
) -> Redirect {
    match form.submit(state.admin_db(&admin.access_token)).await {
        Ok(row) => {
            tracing::info!(entity = E::QUERY_KEY, id = %row.id(), "Saved");
            saved(session, form.success_message(), DASHBOARD_PATH).await
        }
        Err(e) => {
            form.keep_unsaved(session).await;
            match e {
                FormError::MissingField(_) => {
                    failed(session, format!("{}: {e}", E::SAVE_ERROR), &form.reopen_href()).await
                }
                FormError::Repository(_) => {
                    tracing::error!(entity = E::QUERY_KEY, error = %e, "Failed to save");
                    failed(session, E::SAVE_ERROR, &form.reopen_href()).await
                }
            }
        }
    }
}

/// Delete a sale or team member and redirect with the outcome.
pub(crate) async fn delete_entity<E: FormEntity>(
    state: &AppState,
    admin: &AuthSession,
    session: &Session,
    id: E::Id,
) -> Redirect {
    match state.admin_db(&admin.access_token).delete::<E>(id).await {
        Ok(()) => {
            tracing::info!(entity = E::QUERY_KEY, id = %id, "Deleted");
            saved(session, E::DELETED_MESSAGE, DASHBOARD_PATH).await
        }
        Err(e) => {
            tracing::error!(entity = E::QUERY_KEY, id = %id, error = %e, "Failed to delete");
            failed(session, E::DELETE_ERROR, DASHBOARD_PATH).await
        }
    }
}
