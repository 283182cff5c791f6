//! Contact message actions.
//!
//! Both actions post the page they were taken from so the redirect lands
//! back on it.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use frontier_core::ContactMessageId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{failed, page_href, saved};
use crate::dashboard::DashboardSnapshot;
use crate::db::MessageRepository;
use crate::middleware::RequireAdminSession;
use crate::state::AppState;

const MARK_READ_ERROR: &str = "Error updating message status";
const DELETED_MESSAGE: &str = "Message deleted successfully";
const DELETE_ERROR: &str = "Error deleting message";

/// Hidden fields sent with a message action.
#[derive(Debug, Default, Deserialize)]
pub struct MessageActionForm {
    pub page: Option<String>,
}

impl MessageActionForm {
    fn return_to(&self) -> String {
        page_href(self.page.as_deref().and_then(|p| p.trim().parse().ok()))
    }
}

/// Mark a message read.
///
/// POST /admin/messages/{id}/read
#[instrument(skip(admin, state, session))]
pub async fn mark_read(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ContactMessageId>,
    Form(form): Form<MessageActionForm>,
) -> Redirect {
    let return_to = form.return_to();

    match MessageRepository::new(state.admin_db(&admin.access_token))
        .mark_read(id)
        .await
    {
        Ok(_) => {
            tracing::info!(message_id = %id, "Message marked read");
            DashboardSnapshot::clear(&session).await;
            Redirect::to(&return_to)
        }
        Err(e) => {
            tracing::error!(message_id = %id, error = %e, "Failed to mark message read");
            failed(&session, MARK_READ_ERROR, &return_to).await
        }
    }
}

/// Delete a message.
///
/// POST /admin/messages/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ContactMessageId>,
    Form(form): Form<MessageActionForm>,
) -> Redirect {
    let return_to = form.return_to();

    match MessageRepository::new(state.admin_db(&admin.access_token))
        .delete(id)
        .await
    {
        Ok(()) => {
            tracing::info!(message_id = %id, "Message deleted");
            saved(&session, DELETED_MESSAGE, &return_to).await
        }
        Err(e) => {
            tracing::error!(message_id = %id, error = %e, "Failed to delete message");
            failed(&session, DELETE_ERROR, &return_to).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_to_keeps_page() {
        let form = MessageActionForm {
            page: Some("3".to_string()),
        };
        assert_eq!(form.return_to(), "/admin?page=3");
    }

    #[test]
    fn test_return_to_defaults_to_dashboard() {
        assert_eq!(MessageActionForm::default().return_to(), "/admin");
        let form = MessageActionForm {
            page: Some("abc".to_string()),
        };
        assert_eq!(form.return_to(), "/admin");
    }
}
