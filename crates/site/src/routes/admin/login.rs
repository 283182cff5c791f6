//! Admin sign-in and sign-out.
//!
//! Email and password are checked by the remote auth service; the returned
//! tokens live only in the server-side session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::DASHBOARD_PATH;
use crate::dashboard::DashboardSnapshot;
use crate::error::AppError;
use crate::filters;
use crate::layout::Shell;
use crate::middleware::{LOGIN_PATH, OptionalAdminSession, set_current_admin};
use crate::remote::{AuthError, SessionEvent};
use crate::routes;
use crate::state::AppState;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login credentials";
pub const SIGN_IN_ERROR_MESSAGE: &str = "Unable to sign in right now. Please try again.";

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub shell: Shell,
    pub email: String,
    pub error: Option<&'static str>,
}

/// Render the login page, or skip it when already signed in.
///
/// GET /admin/login
#[instrument(skip_all)]
pub async fn login_page(
    State(state): State<AppState>,
    OptionalAdminSession(admin): OptionalAdminSession,
) -> Response {
    if admin.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }

    LoginTemplate {
        shell: routes::shell(&state, LOGIN_PATH).await,
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Sign in with email and password.
///
/// POST /admin/login
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let email = form.email.trim().to_string();
    let password = SecretString::from(form.password);

    let auth = match state.auth().sign_in(&email, &password).await {
        Ok(auth) => auth,
        Err(e) => {
            let (status, message) = match e {
                AuthError::InvalidCredentials => {
                    tracing::info!("Rejected admin sign-in");
                    (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS_MESSAGE)
                }
                other => {
                    tracing::error!(error = %other, "Admin sign-in failed");
                    (StatusCode::BAD_GATEWAY, SIGN_IN_ERROR_MESSAGE)
                }
            };
            let template = LoginTemplate {
                shell: routes::shell(&state, LOGIN_PATH).await,
                email,
                error: Some(message),
            };
            return Ok((status, template).into_response());
        }
    };

    // Fresh session ID on privilege change
    session.cycle_id().await?;
    set_current_admin(&session, &auth).await?;
    DashboardSnapshot::clear(&session).await;

    state.session_events().publish(&SessionEvent::SignedIn {
        email: auth.email.clone(),
    });

    Ok(Redirect::to(DASHBOARD_PATH).into_response())
}

/// Sign out and clear the session.
///
/// POST /admin/logout
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalAdminSession(admin): OptionalAdminSession,
) -> Redirect {
    if let Some(auth) = &admin {
        // Token revocation is best-effort; the local session goes regardless
        if let Err(e) = state.auth().sign_out(&auth.access_token).await {
            tracing::warn!(error = %e, "Remote sign-out failed");
        }
    }

    if let Err(e) = session.flush().await {
        tracing::warn!(error = %e, "Failed to flush session");
    }

    state.session_events().publish(&SessionEvent::SignedOut {
        email: admin.map(|auth| auth.email),
    });

    Redirect::to(LOGIN_PATH)
}
