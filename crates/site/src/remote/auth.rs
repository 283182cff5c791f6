//! Client for the hosted auth API (GoTrue dialect).
//!
//! The site only needs three calls: password sign-in, refresh-token
//! exchange, and sign-out. Holding a valid session is the sole
//! authorization check for the admin panel; there are no roles.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use super::RemoteError;

/// Sessions are treated as expired this many seconds before the server says so.
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Errors from the auth API.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair was rejected.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Refresh token is no longer accepted.
    #[error("Session expired")]
    SessionExpired,

    /// Transport or unexpected API failure.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
}

/// Tokens for a signed-in admin, stored in the server-side session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is invalid.
    pub expires_at: i64,
    pub email: String,
}

impl AuthSession {
    /// Whether the access token should be refreshed before use.
    #[must_use]
    pub const fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at - EXPIRY_MARGIN_SECS
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("email", &self.email)
            .finish()
    }
}

/// Password sign-in, token refresh, and sign-out.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange an email and password for a session.
    async fn sign_in(&self, email: &str, password: &SecretString)
    -> Result<AuthSession, AuthError>;

    /// Exchange a refresh token for a new session.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}

/// HTTP client for `{REMOTE_URL}/auth/v1`.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    auth_url: Url,
    anon_key: SecretString,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    #[serde(default)]
    expires_at: Option<i64>,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str, now: DateTime<Utc>) -> AuthSession {
        AuthSession {
            expires_at: self
                .expires_at
                .unwrap_or_else(|| now.timestamp() + self.expires_in),
            email: self
                .user
                .email
                .unwrap_or_else(|| fallback_email.to_string()),
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        }
    }
}

impl AuthClient {
    /// Create a client for the project at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the endpoint URL
    /// cannot be derived from `base_url`.
    pub fn new(base_url: &Url, anon_key: SecretString) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let auth_url = base_url.join("auth/v1/")?;

        Ok(Self {
            inner: Arc::new(AuthClientInner {
                client,
                auth_url,
                anon_key,
            }),
        })
    }

    fn token_url(&self, grant_type: &str) -> Result<Url, RemoteError> {
        let mut url = self.inner.auth_url.join("token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        Ok(url)
    }

    /// POST to the token endpoint. `rejected` is returned for 400/401 responses.
    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
        rejected: AuthError,
    ) -> Result<TokenResponse, AuthError> {
        let url = self.token_url(grant_type)?;
        let response = self
            .inner
            .client
            .post(url)
            .header("apikey", self.inner.anon_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(RemoteError::from)?;

        let status = response.status();
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            return Err(rejected);
        }

        let text = response.text().await.map_err(RemoteError::from)?;
        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: text.chars().take(500).collect(),
            }
            .into());
        }

        Ok(serde_json::from_str(&text).map_err(RemoteError::from)?)
    }
}

#[async_trait]
impl AuthService for AuthClient {
    #[instrument(skip(self, password))]
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let token = self
            .token_grant("password", body, AuthError::InvalidCredentials)
            .await?;
        Ok(token.into_session(email, Utc::now()))
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let token = self
            .token_grant("refresh_token", body, AuthError::SessionExpired)
            .await?;
        Ok(token.into_session("", Utc::now()))
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = self.inner.auth_url.join("logout").map_err(RemoteError::from)?;
        let response = self
            .inner
            .client
            .post(url)
            .header("apikey", self.inner.anon_key.expose_secret())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(RemoteError::from)?;

        let status = response.status();
        // 401 means the token was already revoked.
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        }
        .into())
    }
}
