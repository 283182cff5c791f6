//! Public sale listings.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use frontier_core::{SALE_PLACEHOLDER_IMAGE, Sale};
use tracing::instrument;

use crate::db::SaleRepository;
use crate::filters;
use crate::layout::Shell;
use crate::state::AppState;

/// Banner shown when the listing cannot be loaded.
pub const SALES_ERROR_MESSAGE: &str = "We couldn't load our sales right now. Please try again later.";

/// Sales listing template.
#[derive(Template, WebTemplate)]
#[template(path = "sales.html")]
pub struct SalesTemplate {
    pub shell: Shell,
    pub sales: Vec<Sale>,
    pub error: Option<&'static str>,
    /// Swapped in by the browser when an image fails to load.
    pub placeholder: &'static str,
}

/// Display every sale, newest first.
///
/// A remote failure is logged and rendered as an error banner.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let (sales, error) = match SaleRepository::new(state.anonymous_db()).list().await {
        Ok(sales) => (sales, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load sales");
            (Vec::new(), Some(SALES_ERROR_MESSAGE))
        }
    };

    SalesTemplate {
        shell: super::shell(&state, "/sales").await,
        sales,
        error,
        placeholder: SALE_PLACEHOLDER_IMAGE,
    }
}
