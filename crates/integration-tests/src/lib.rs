//! End-to-end tests for the Frontier Estate Services site.
//!
//! Each test spawns the full application router on an ephemeral port, backed
//! by the in-memory data and auth services, and drives it over HTTP with a
//! cookie-keeping client. No hosted backend is needed:
//!
//! ```bash
//! cargo test -p frontier-integration-tests
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use frontier_site::config::{RemoteConfig, SiteConfig};
use frontier_site::remote::{MemoryAuth, MemoryDataService, Mutation, Table};
use frontier_site::state::AppState;
use reqwest::{Client, Response, redirect};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

pub const ADMIN_EMAIL: &str = "owner@frontier.example";
pub const ADMIN_PASSWORD: &str = "estate-sale-admin-password";

/// Configuration for a test server; nothing is read from the environment.
///
/// # Panics
///
/// Panics if the fixed test addresses fail to parse.
#[must_use]
pub fn test_config() -> SiteConfig {
    SiteConfig {
        host: "127.0.0.1".parse().expect("valid loopback address"),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        remote: RemoteConfig {
            url: Url::parse("http://127.0.0.1:54321/").expect("valid remote URL"),
            anon_key: SecretString::from("integration-test-anon-key"),
        },
        layout_cache_ttl: Duration::from_secs(60),
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../site/static")),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A running site plus the in-memory services behind it.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub data: MemoryDataService,
    pub auth: MemoryAuth,
}

impl TestApp {
    /// Serve the site over `data` with a single admin account.
    pub async fn spawn(data: MemoryDataService) -> Self {
        Self::spawn_with_auth(data, MemoryAuth::new()).await
    }

    /// Serve the site over `data` and `auth`; the admin account is added.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind or the client cannot be built.
    pub async fn spawn_with_auth(data: MemoryDataService, auth: MemoryAuth) -> Self {
        let auth = auth.with_user(ADMIN_EMAIL, ADMIN_PASSWORD);
        let state =
            AppState::with_services(test_config(), Arc::new(data.clone()), Arc::new(auth.clone()));
        let app = frontier_site::app(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("test server failed");
        });

        // Redirects are asserted on, never followed
        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            data,
            auth,
        }
    }

    /// Serve the site over an empty store.
    pub async fn spawn_empty() -> Self {
        Self::spawn(MemoryDataService::new()).await
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Fetch `path` and return its body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or does not answer 200.
    pub async fn page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), 200, "GET {path}");
        response.text().await.expect("failed to read body")
    }

    /// Sign in as the admin account.
    ///
    /// # Panics
    ///
    /// Panics if sign-in does not redirect to the dashboard.
    pub async fn sign_in(&self) {
        let response = self
            .post_form(
                "/admin/login",
                &[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)],
            )
            .await;
        assert_eq!(location(&response).as_deref(), Some("/admin"));
    }

    /// Writes issued against `table`, oldest first.
    #[must_use]
    pub fn mutations_on(&self, table: Table) -> Vec<Mutation> {
        self.data
            .mutations()
            .into_iter()
            .filter(|mutation| match mutation {
                Mutation::Insert { table: t, .. }
                | Mutation::Update { table: t, .. }
                | Mutation::Delete { table: t, .. } => *t == table,
            })
            .collect()
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

// =============================================================================
// Fixture rows
// =============================================================================

#[must_use]
pub fn sale_row(title: &str, created_at: &str) -> Value {
    json!({
        "title": title,
        "dates": "June 7-8, 2025",
        "location": "Wilmington, NC",
        "description": "Furniture, tools, and collectibles",
        "image_url": null,
        "status": "upcoming",
        "created_at": created_at,
    })
}

#[must_use]
pub fn team_row(name: &str, role: &str) -> Value {
    json!({
        "name": name,
        "role": role,
        "bio": "Twenty years in the estate business.",
        "image_url": null,
    })
}

#[must_use]
pub fn message_row(n: usize, read: bool) -> Value {
    json!({
        "name": format!("Sender {n:02}"),
        "email": format!("sender{n}@example.com"),
        "phone": null,
        "message": format!("Message number {n}"),
        "created_at": format!("2025-03-{:02}T12:00:00.000000Z", 28 - n),
        "read": read,
    })
}

#[must_use]
pub fn business_info_row(address: &str) -> Value {
    json!({
        "address": address,
        "phone": "(910) 338-9258",
        "email": "frontierestateservices@gmail.com",
        "is_active": true,
    })
}

/// Rows of `table` with `is_active = true`.
#[must_use]
pub fn active_rows(data: &MemoryDataService, table: Table) -> Vec<Value> {
    data.rows(table)
        .into_iter()
        .filter(|row| row.get("is_active") == Some(&Value::Bool(true)))
        .collect()
}
