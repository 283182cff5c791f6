//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /sales                  - Sale listings, newest first
//! GET  /about                  - Company story and team
//! GET  /contact                - Contact page
//! POST /contact                - Submit a contact message (rate limited)
//!
//! # Health
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (remote reachable)
//!
//! # Admin (see [`admin`])
//! /admin/...
//! ```

pub mod about;
pub mod admin;
pub mod contact;
pub mod health;
pub mod home;
pub mod sales;

use axum::{
    Router,
    routing::{get, post},
};

use crate::layout::Shell;
use crate::middleware::contact_rate_limiter;
use crate::state::AppState;

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/sales", get(sales::index))
        .route("/about", get(about::about))
        .route(
            "/contact",
            get(contact::show).merge(post(contact::submit).layer(contact_rate_limiter())),
        )
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/admin", admin::routes())
}

/// Header and footer data for a public page at `path`.
pub(crate) async fn shell(state: &AppState, path: &str) -> Shell {
    Shell::new(&state.layout().await, path)
}
