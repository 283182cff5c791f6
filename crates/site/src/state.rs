//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;

use crate::config::SiteConfig;
use crate::db::Db;
use crate::layout::LayoutData;
use crate::remote::{
    AuthClient, AuthService, DataService, RemoteError, RestClient, SessionEvents, Subscription,
    events::log_session_event,
};

const LAYOUT_KEY: &str = "layout";

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// remote services, the layout cache, and session notifications.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    data: Arc<dyn DataService>,
    auth: Arc<dyn AuthService>,
    layout: Cache<&'static str, LayoutData>,
    session_events: SessionEvents,
    _session_log: Subscription,
}

impl AppState {
    /// Create state backed by the hosted API named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URLs cannot be derived or an HTTP
    /// client cannot be built.
    pub fn new(config: SiteConfig) -> Result<Self, RemoteError> {
        let data = RestClient::new(&config.remote.url, config.remote.anon_key.clone())?;
        let auth = AuthClient::new(&config.remote.url, config.remote.anon_key.clone())?;
        Ok(Self::with_services(config, Arc::new(data), Arc::new(auth)))
    }

    /// Create state over arbitrary service implementations.
    #[must_use]
    pub fn with_services(
        config: SiteConfig,
        data: Arc<dyn DataService>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        let layout = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.layout_cache_ttl)
            .build();

        let session_events = SessionEvents::new();
        let session_log = session_events.subscribe(log_session_event);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                data,
                auth,
                layout,
                session_events,
                _session_log: session_log,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get the remote data service.
    #[must_use]
    pub fn data(&self) -> &dyn DataService {
        self.inner.data.as_ref()
    }

    /// Get the remote auth service.
    #[must_use]
    pub fn auth(&self) -> &dyn AuthService {
        self.inner.auth.as_ref()
    }

    /// Session change notifications.
    #[must_use]
    pub fn session_events(&self) -> &SessionEvents {
        &self.inner.session_events
    }

    /// Data access with the anonymous key.
    #[must_use]
    pub fn anonymous_db(&self) -> Db<'_> {
        Db::anonymous(self.data())
    }

    /// Data access as a signed-in admin.
    #[must_use]
    pub fn admin_db<'a>(&'a self, access_token: &'a str) -> Db<'a> {
        Db::authenticated(self.data(), access_token)
    }

    /// Active business info and social links, cached.
    ///
    /// A load failure is logged and yields empty layout data; it is not cached.
    pub async fn layout(&self) -> LayoutData {
        if let Some(layout) = self.inner.layout.get(LAYOUT_KEY).await {
            return layout;
        }

        match LayoutData::load(self.anonymous_db()).await {
            Ok(layout) => {
                self.inner.layout.insert(LAYOUT_KEY, layout.clone()).await;
                layout
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load layout data");
                LayoutData::default()
            }
        }
    }

    /// Drop cached layout data after the settings change.
    pub async fn invalidate_layout(&self) {
        self.inner.layout.invalidate(LAYOUT_KEY).await;
    }
}
