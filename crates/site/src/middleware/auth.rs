//! Admin session gate.
//!
//! Provides extractors for requiring a signed-in admin in route handlers.
//! Session presence is the only authorisation check; the remote service
//! enforces row-level rules on the bearer token.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use crate::middleware::session_keys;
use crate::remote::{AuthSession, SessionEvent};
use crate::state::AppState;

/// Where signed-out admins are sent.
pub const LOGIN_PATH: &str = "/admin/login";

/// Extractor that requires a signed-in admin.
///
/// An expired access token is refreshed once; if that fails the session is
/// cleared and the request redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireAdminSession(auth): RequireAdminSession) -> impl IntoResponse {
///     format!("Signed in as {}", auth.email)
/// }
/// ```
pub struct RequireAdminSession(pub AuthSession);

/// Error returned when the gate rejects a request.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// Session layer missing from the router.
    MissingSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::MissingSession => {
                tracing::error!("Session layer missing; admin gate cannot run");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl FromRequestParts<AppState> for RequireAdminSession {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::MissingSession)?;

        let auth = current_admin(&session)
            .await
            .ok_or(AuthRejection::RedirectToLogin)?;

        if !auth.is_expired(Utc::now()) {
            return Ok(Self(auth));
        }

        match state.auth().refresh(&auth.refresh_token).await {
            Ok(mut refreshed) => {
                if refreshed.email.is_empty() {
                    refreshed.email.clone_from(&auth.email);
                }
                if let Err(e) = set_current_admin(&session, &refreshed).await {
                    tracing::error!(error = %e, "Failed to store refreshed session");
                    return Err(AuthRejection::RedirectToLogin);
                }
                state.session_events().publish(&SessionEvent::TokenRefreshed {
                    email: refreshed.email.clone(),
                });
                Ok(Self(refreshed))
            }
            Err(e) => {
                tracing::info!(error = %e, "Session refresh failed, signing out");
                clear_admin_session(&session).await;
                state.session_events().publish(&SessionEvent::SignedOut {
                    email: Some(auth.email),
                });
                Err(AuthRejection::RedirectToLogin)
            }
        }
    }
}

/// Extractor that optionally gets the signed-in admin.
///
/// Does not refresh tokens; used where presence alone decides a redirect.
pub struct OptionalAdminSession(pub Option<AuthSession>);

impl<S> FromRequestParts<S> for OptionalAdminSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = match parts.extensions.get::<Session>() {
            Some(session) => current_admin(session).await,
            None => None,
        };

        Ok(Self(auth))
    }
}

async fn current_admin(session: &Session) -> Option<AuthSession> {
    session
        .get::<AuthSession>(session_keys::ADMIN_AUTH)
        .await
        .ok()
        .flatten()
}

/// Helper to store the signed-in admin's tokens in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    auth: &AuthSession,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ADMIN_AUTH, auth).await
}

/// Remove the admin's tokens and dashboard state from the session.
pub async fn clear_admin_session(session: &Session) {
    for key in [session_keys::ADMIN_AUTH, session_keys::DASHBOARD] {
        if let Err(e) = session.remove_value(key).await {
            tracing::warn!(error = %e, key, "Failed to clear session value");
        }
    }
}
