//! Clients for the hosted backend: the row-level data API and the auth API.
//!
//! # Architecture
//!
//! - The remote service is the source of truth; nothing is stored locally
//!   except the layout cache and per-session dashboard snapshots.
//! - [`DataService`] and [`AuthService`] are the seams: HTTP clients
//!   ([`RestClient`], [`AuthClient`]) talk to the hosted API, in-memory
//!   implementations ([`MemoryDataService`], [`MemoryAuth`]) back local runs
//!   and tests.
//! - Rows travel as `serde_json::Value`; decoding into domain types happens
//!   in [`crate::db`].

pub mod auth;
pub mod events;
pub mod memory;
pub mod query;
pub mod rest;

pub use auth::{AuthClient, AuthError, AuthService, AuthSession};
pub use events::{SessionEvent, SessionEvents, SessionListener, Subscription};
pub use memory::{MemoryAuth, MemoryDataService, Mutation};
pub use query::{Direction, Filter, Order, Select, Table};
pub use rest::RestClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the remote data API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the JSON we expected.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL could not be extended into an endpoint URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Row-level CRUD against the remote store.
///
/// `bearer` is the signed-in admin's access token; `None` means the request
/// runs with the anonymous key.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Every row matching the query, in the requested order.
    async fn select(&self, query: &Select, bearer: Option<&str>)
    -> Result<Vec<Value>, RemoteError>;

    /// Insert one row and return the stored representation.
    async fn insert(
        &self,
        table: Table,
        row: Value,
        bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError>;

    /// Insert one row without reading it back.
    ///
    /// For tables the caller may write but not read, such as contact
    /// messages submitted with the anonymous key.
    async fn insert_without_return(
        &self,
        table: Table,
        row: Value,
        bearer: Option<&str>,
    ) -> Result<(), RemoteError>;

    /// Merge `patch` into every row matching all filters and return the
    /// updated rows.
    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
        bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError>;

    /// Delete every row matching all filters and return the removed rows.
    async fn delete(
        &self,
        table: Table,
        filters: &[Filter],
        bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError>;

    /// Check that the service is reachable.
    async fn ping(&self) -> Result<(), RemoteError>;
}
