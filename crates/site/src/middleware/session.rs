//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The session holds the
//! remote auth tokens, the dashboard snapshot, pending flash messages and
//! the values of a form whose save failed; none of it needs to survive a
//! restart.
//!
//! `MemoryStore` never purges expired records, and a dashboard snapshot
//! copies every panel's rows. An admin who never logs out leaves that copy
//! in memory until the process restarts. Admin sessions are few, so this is
//! bounded in practice; a store with expiry deletion would be needed for
//! many concurrent admins.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SiteConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "frontier_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// Remote auth tokens of the signed-in admin.
    pub const ADMIN_AUTH: &str = "admin_auth";
    /// Last dashboard snapshot.
    pub const DASHBOARD: &str = "dashboard";
    /// Pending one-shot notice.
    pub const FLASH: &str = "flash";
    /// Prefix for a failed form's values; the form's query key follows.
    pub const UNSAVED_FORM_PREFIX: &str = "unsaved_form.";
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &SiteConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
