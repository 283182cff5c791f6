//! Admin dashboard data: one snapshot of all five panels per session.
//!
//! The snapshot is reloaded by [`DashboardSnapshot::refresh`] when the
//! dashboard is first opened and after every successful mutation. Paging
//! and opening forms render from the stored snapshot without new queries.

use frontier_core::{BusinessInfo, ContactMessage, Sale, SocialLinks, TeamMember};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{
    Db, MessageRepository, RepositoryError, SaleRepository, SettingsRepository, TeamRepository,
};
use crate::middleware::session_keys;

/// Banner shown when any query in a refresh fails.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading data";

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub business_info: Option<BusinessInfo>,
    pub social_links: Option<SocialLinks>,
    /// Newest first.
    pub messages: Vec<ContactMessage>,
    /// Newest first.
    pub sales: Vec<Sale>,
    /// By name.
    pub team: Vec<TeamMember>,
    /// Whether any query in the last refresh failed.
    pub load_failed: bool,
}

impl DashboardSnapshot {
    /// Issue all five reads concurrently.
    ///
    /// Failures are logged and flagged; whatever succeeded is kept.
    #[instrument(skip(db))]
    pub async fn refresh(db: Db<'_>) -> Self {
        let settings = SettingsRepository::new(db);
        let messages = MessageRepository::new(db);
        let sales = SaleRepository::new(db);
        let team = TeamRepository::new(db);

        let (business_info, social_links, messages, sales, team) = tokio::join!(
            settings.active_business_info(),
            settings.active_social_links(),
            messages.list(),
            sales.list_for_editing(),
            team.list(),
        );

        let mut load_failed = false;
        let business_info = keep("business_info", business_info, &mut load_failed).flatten();
        let social_links = keep("social_links", social_links, &mut load_failed).flatten();
        let messages = keep("contact_messages", messages, &mut load_failed).unwrap_or_default();
        let sales = keep("sales", sales, &mut load_failed).unwrap_or_default();
        let team = keep("team_members", team, &mut load_failed).unwrap_or_default();

        Self {
            business_info,
            social_links,
            messages,
            sales,
            team,
            load_failed,
        }
    }

    /// The snapshot stored in `session`, if any.
    pub async fn load(session: &Session) -> Option<Self> {
        session
            .get::<Self>(session_keys::DASHBOARD)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read dashboard snapshot");
                None
            })
    }

    /// Remember this snapshot for paging and form rendering.
    pub async fn store(&self, session: &Session) {
        if let Err(e) = session.insert(session_keys::DASHBOARD, self).await {
            tracing::warn!(error = %e, "Failed to store dashboard snapshot");
        }
    }

    /// Forget the stored snapshot so the next dashboard visit reloads.
    pub async fn clear(session: &Session) {
        if let Err(e) = session.remove_value(session_keys::DASHBOARD).await {
            tracing::warn!(error = %e, "Failed to clear dashboard snapshot");
        }
    }

    /// Number of messages not yet marked read.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.read).count()
    }
}

fn keep<T>(query: &str, result: Result<T, RepositoryError>, failed: &mut bool) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(query, error = %e, "Dashboard query failed");
            *failed = true;
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::remote::{MemoryDataService, Table};

    fn seeded() -> MemoryDataService {
        MemoryDataService::new()
            .with_rows(
                Table::Sales,
                [json!({"title": "Estate A", "dates": "-", "location": "-",
                        "description": "-", "status": "active"})],
            )
            .with_rows(
                Table::TeamMembers,
                [
                    json!({"name": "Zoe", "role": "Appraiser", "bio": "-"}),
                    json!({"name": "Ana", "role": "Owner", "bio": "-"}),
                ],
            )
            .with_rows(
                Table::ContactMessages,
                [json!({"name": "Pat", "email": "pat@example.com", "message": "Hi"})],
            )
    }

    #[tokio::test]
    async fn test_refresh_loads_every_panel() {
        let service = seeded();
        let snapshot = DashboardSnapshot::refresh(Db::authenticated(&service, "token")).await;

        assert!(!snapshot.load_failed);
        assert!(snapshot.business_info.is_none());
        assert_eq!(snapshot.sales.len(), 1);
        let names: Vec<&str> = snapshot.team.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Zoe"]);
        assert_eq!(snapshot.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_query_keeps_the_rest() {
        let service = seeded();
        service.fail_table(Table::Sales);

        let snapshot = DashboardSnapshot::refresh(Db::authenticated(&service, "token")).await;

        assert!(snapshot.load_failed);
        assert!(snapshot.sales.is_empty());
        assert_eq!(snapshot.team.len(), 2);
        assert_eq!(snapshot.messages.len(), 1);
    }
}
