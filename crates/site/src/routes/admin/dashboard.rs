//! Admin dashboard page.
//!
//! A bare `GET /admin` reloads every panel and stores the snapshot in the
//! session. Paging (`?page=N`) and opening a form (`?sale=…`, `?member=…`)
//! render from the stored snapshot without new queries.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use frontier_core::{
    BusinessInfoDraft, ContactMessage, ContactMessageId, MESSAGES_PER_PAGE, Pagination,
    SALE_PLACEHOLDER_IMAGE, Sale, TEAM_MEMBER_PLACEHOLDER_IMAGE, TeamMember,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::DASHBOARD_PATH;
use crate::components::{EntityForm, FormEntity};
use crate::dashboard::{DashboardSnapshot, LOAD_ERROR_MESSAGE};
use crate::filters;
use crate::flash::{Flash, take_flash};
use crate::layout::Shell;
use crate::middleware::RequireAdminSession;
use crate::routes;
use crate::state::AppState;

/// Dashboard query parameters.
///
/// Kept as raw text so a malformed value falls back to the default view
/// rather than rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub page: Option<String>,
    pub sale: Option<String>,
    pub member: Option<String>,
}

impl DashboardQuery {
    const fn is_empty(&self) -> bool {
        self.page.is_none() && self.sale.is_none() && self.member.is_none()
    }

    fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// A contact message as listed on the dashboard.
pub struct MessageRow {
    pub id: ContactMessageId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub received: String,
    pub read: bool,
}

impl From<&ContactMessage> for MessageRow {
    fn from(message: &ContactMessage) -> Self {
        Self {
            id: message.id,
            name: message.name.clone(),
            email: message.email.clone(),
            phone: message.phone.clone(),
            message: message.message.clone(),
            received: message.created_at.format("%b %-d, %Y").to_string(),
            read: message.read,
        }
    }
}

/// One numbered page control.
pub struct PageLink {
    pub number: usize,
    pub current: bool,
}

/// Current social link values as form text.
#[derive(Default)]
pub struct SocialValues {
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
}

/// Everything the panels render, derived from a snapshot and the query.
pub struct DashboardPanels {
    pub load_error: Option<&'static str>,
    pub sales: Vec<Sale>,
    pub sale_form: Option<EntityForm<Sale>>,
    pub team: Vec<TeamMember>,
    pub member_form: Option<EntityForm<TeamMember>>,
    pub messages: Vec<MessageRow>,
    pub unread: usize,
    pub page: usize,
    pub pages: Vec<PageLink>,
    pub previous_page: Option<usize>,
    pub next_page: Option<usize>,
    pub business: BusinessInfoDraft,
    pub social: SocialValues,
}

impl DashboardPanels {
    fn build(snapshot: &DashboardSnapshot, query: &DashboardQuery) -> Self {
        let pagination = Pagination::new(snapshot.messages.len(), MESSAGES_PER_PAGE, query.page());
        let messages = pagination
            .slice(&snapshot.messages)
            .iter()
            .map(MessageRow::from)
            .collect();
        let pages = if pagination.has_multiple_pages() {
            pagination
                .pages()
                .map(|number| PageLink {
                    number,
                    current: number == pagination.current(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let business = snapshot
            .business_info
            .as_ref()
            .map(|info| BusinessInfoDraft {
                address: info.address.clone(),
                phone: info.phone.clone(),
                email: info.email.clone(),
            })
            .unwrap_or_default();

        let social = snapshot
            .social_links
            .as_ref()
            .map(|links| SocialValues {
                facebook: links.facebook.clone().unwrap_or_default(),
                instagram: links.instagram.clone().unwrap_or_default(),
                linkedin: links.linkedin.clone().unwrap_or_default(),
            })
            .unwrap_or_default();

        Self {
            load_error: snapshot.load_failed.then_some(LOAD_ERROR_MESSAGE),
            sales: snapshot.sales.clone(),
            sale_form: open_form(query.sale.as_deref(), &snapshot.sales),
            team: snapshot.team.clone(),
            member_form: open_form(query.member.as_deref(), &snapshot.team),
            messages,
            unread: snapshot.unread_count(),
            page: pagination.current(),
            pages,
            previous_page: pagination.previous(),
            next_page: pagination.next(),
            business,
            social,
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub shell: Shell,
    pub admin_email: String,
    pub flash: Option<Flash>,
    pub panels: DashboardPanels,
    pub sale_placeholder: &'static str,
    pub member_placeholder: &'static str,
}

/// Display the dashboard.
///
/// GET /admin
#[instrument(skip(admin, state, session))]
pub async fn show(
    RequireAdminSession(admin): RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let stored = if query.is_empty() {
        None
    } else {
        DashboardSnapshot::load(&session).await
    };

    let snapshot = match stored {
        Some(snapshot) => snapshot,
        None => {
            let snapshot = DashboardSnapshot::refresh(state.admin_db(&admin.access_token)).await;
            snapshot.store(&session).await;
            snapshot
        }
    };

    let mut panels = DashboardPanels::build(&snapshot, &query);
    restore_unsaved(&session, panels.sale_form.as_mut()).await;
    restore_unsaved(&session, panels.member_form.as_mut()).await;

    DashboardTemplate {
        shell: routes::shell(&state, DASHBOARD_PATH).await,
        admin_email: admin.email,
        flash: take_flash(&session).await,
        panels,
        sale_placeholder: SALE_PLACEHOLDER_IMAGE,
        member_placeholder: TEAM_MEMBER_PLACEHOLDER_IMAGE,
    }
}

/// Put back the values of a failed save into the reopened form. Held
/// values are dropped on any render so they never outlive one redirect.
async fn restore_unsaved<E: FormEntity>(session: &Session, form: Option<&mut EntityForm<E>>) {
    let unsaved = EntityForm::<E>::take_unsaved(session).await;
    if let (Some(form), Some(unsaved)) = (form, unsaved) {
        form.restore(unsaved);
    }
}

/// Resolve `?sale=` / `?member=` into an open form.
///
/// `new` opens a create form; an ID opens an edit form on that row. Unknown
/// IDs leave the form closed.
fn open_form<E>(selector: Option<&str>, rows: &[E]) -> Option<EntityForm<E>>
where
    E: FormEntity,
    E::Id: std::str::FromStr + PartialEq,
{
    match selector?.trim() {
        "new" => Some(EntityForm::new(None)),
        raw => {
            let id = raw.parse::<E::Id>().ok()?;
            let found = rows.iter().find(|row| row.id() == id);
            if found.is_none() {
                tracing::debug!(entity = E::QUERY_KEY, id = raw, "Form target not found");
            }
            found.map(|row| EntityForm::new(Some(row)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use frontier_core::{SaleId, SaleStatus, TeamMemberId};

    use super::*;

    fn message(n: i64, read: bool) -> ContactMessage {
        ContactMessage {
            id: ContactMessageId::random(),
            name: format!("Sender {n}"),
            email: format!("sender{n}@example.com"),
            phone: None,
            message: "Hello".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() - Duration::days(n),
            read,
        }
    }

    fn sale(title: &str) -> Sale {
        Sale {
            id: SaleId::random(),
            title: title.to_string(),
            dates: "May 1".to_string(),
            location: "Leland".to_string(),
            description: "Tools".to_string(),
            image_url: None,
            status: SaleStatus::Active,
            created_at: Utc::now(),
            unrecognized_status: None,
        }
    }

    fn query(page: Option<&str>, sale: Option<&str>) -> DashboardQuery {
        DashboardQuery {
            page: page.map(String::from),
            sale: sale.map(String::from),
            member: None,
        }
    }

    #[test]
    fn test_first_page_shows_five_newest() {
        let snapshot = DashboardSnapshot {
            messages: (0..12).map(|n| message(n, n % 2 == 0)).collect(),
            ..DashboardSnapshot::default()
        };

        let view = DashboardPanels::build(&snapshot, &DashboardQuery::default());

        let names: Vec<&str> = view.messages.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Sender 0", "Sender 1", "Sender 2", "Sender 3", "Sender 4"]
        );
        assert_eq!(view.pages.len(), 3);
        assert!(view.pages.first().unwrap().current);
        assert_eq!(view.previous_page, None);
        assert_eq!(view.next_page, Some(2));
        assert_eq!(view.unread, 6);
    }

    #[test]
    fn test_page_out_of_range_clamps() {
        let snapshot = DashboardSnapshot {
            messages: (0..7).map(|n| message(n, false)).collect(),
            ..DashboardSnapshot::default()
        };

        let view = DashboardPanels::build(&snapshot, &query(Some("9"), None));
        assert_eq!(view.page, 2);
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.previous_page, Some(1));
        assert_eq!(view.next_page, None);

        let view = DashboardPanels::build(&snapshot, &query(Some("junk"), None));
        assert_eq!(view.page, 1);
    }

    #[test]
    fn test_single_page_has_no_controls() {
        let snapshot = DashboardSnapshot {
            messages: (0..5).map(|n| message(n, true)).collect(),
            ..DashboardSnapshot::default()
        };
        assert!(
            DashboardPanels::build(&snapshot, &DashboardQuery::default())
                .pages
                .is_empty()
        );
    }

    #[test]
    fn test_open_forms_from_query() {
        let existing = sale("Estate of J. Smith");
        let snapshot = DashboardSnapshot {
            sales: vec![existing.clone()],
            ..DashboardSnapshot::default()
        };

        let view = DashboardPanels::build(&snapshot, &query(None, Some("new")));
        assert!(!view.sale_form.unwrap().is_edit());

        let id = existing.id.to_string();
        let view = DashboardPanels::build(&snapshot, &query(None, Some(&id)));
        let form = view.sale_form.unwrap();
        assert!(form.is_edit());
        assert_eq!(form.values.title, "Estate of J. Smith");

        let missing = SaleId::random().to_string();
        assert!(
            DashboardPanels::build(&snapshot, &query(None, Some(&missing)))
                .sale_form
                .is_none()
        );
    }

    #[test]
    fn test_unknown_member_keeps_form_closed() {
        let query = DashboardQuery {
            member: Some(TeamMemberId::random().to_string()),
            ..DashboardQuery::default()
        };
        let view = DashboardPanels::build(&DashboardSnapshot::default(), &query);
        assert!(view.member_form.is_none());
    }

    #[test]
    fn test_load_failure_shows_banner() {
        let snapshot = DashboardSnapshot {
            load_failed: true,
            ..DashboardSnapshot::default()
        };
        let view = DashboardPanels::build(&snapshot, &DashboardQuery::default());
        assert_eq!(view.load_error, Some("Error loading data"));
        assert!(view.business.address.is_empty());
    }
}
