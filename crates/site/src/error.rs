//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Handlers that fail as a whole return
//! `Result<T, AppError>`; handlers that degrade to an error banner log and
//! render instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::remote::RemoteError;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// The hosted backend could not be reached or answered with an error.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Remote(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        // Don't expose internal error details to clients
        let message = match self {
            Self::Remote(_) => "External service unavailable",
            Self::Session(_) => "Internal server error",
        };

        (status, message).into_response()
    }
}

/// Associate subsequent Sentry events with the signed-in admin.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the admin.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_failure_is_unavailable() {
        let err = AppError::Remote(RemoteError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_display_names_the_source() {
        let err = AppError::Remote(RemoteError::Api {
            status: 404,
            message: "relation does not exist".to_string(),
        });
        assert!(err.to_string().starts_with("Remote error:"));
    }
}
