//! Typed access to the remote tables.
//!
//! # Tables
//!
//! - `business_info` - Singleton contact details ([`SettingsRepository`])
//! - `social_links` - Singleton social profile links ([`SettingsRepository`])
//! - `sales` - Estate sale listings ([`SaleRepository`])
//! - `team_members` - About-page team ([`TeamRepository`])
//! - `contact_messages` - Contact form submissions ([`MessageRepository`])
//!
//! Every repository is a thin borrow of a [`Db`], which pairs the data
//! service with the bearer token of the request (if any).

pub mod messages;
pub mod sales;
pub mod settings;
pub mod team;

pub use messages::MessageRepository;
pub use sales::SaleRepository;
pub use settings::SettingsRepository;
pub use team::TeamRepository;

use std::fmt::Display;

use frontier_core::Draft;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::remote::{DataService, Filter, RemoteError, Select, Table};

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The remote service call failed.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// A row could not be decoded into its domain type.
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// No row matched.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// A table row with a typed identifier and a writable draft form.
pub trait Entity: DeserializeOwned + Send + Sync {
    type Id: Display + Copy + Send + Sync;
    type Draft: Draft + Serialize + Send + Sync;

    const TABLE: Table;

    fn id(&self) -> Self::Id;
}

/// The data service as seen by one request.
#[derive(Clone, Copy)]
pub struct Db<'a> {
    service: &'a dyn DataService,
    bearer: Option<&'a str>,
}

impl<'a> Db<'a> {
    /// Access with the anonymous key (public pages).
    #[must_use]
    pub const fn anonymous(service: &'a dyn DataService) -> Self {
        Self {
            service,
            bearer: None,
        }
    }

    /// Access with a signed-in admin's access token.
    #[must_use]
    pub const fn authenticated(service: &'a dyn DataService, access_token: &'a str) -> Self {
        Self {
            service,
            bearer: Some(access_token),
        }
    }

    /// The raw rows matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Remote` if the query fails.
    pub async fn fetch_rows(&self, query: &Select) -> Result<Vec<Value>, RepositoryError> {
        Ok(self.service.select(query, self.bearer).await?)
    }

    /// Every row matching `query` that decodes.
    ///
    /// Rows that do not decode are logged and left out, so one bad row
    /// never hides the rest of the table.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Remote` if the query fails.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        query: &Select,
    ) -> Result<Vec<T>, RepositoryError> {
        let rows = self.fetch_rows(query).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match decode(query.table, row) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(table = %query.table, error = %e, "Skipping undecodable row");
                    None
                }
            })
            .collect())
    }

    /// Insert a row and return what was stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Remote` if the insert fails, or
    /// `RepositoryError::DataCorruption` if nothing decodable came back.
    pub async fn insert<T: DeserializeOwned>(
        &self,
        table: Table,
        row: Map<String, Value>,
    ) -> Result<T, RepositoryError> {
        let stored = self
            .service
            .insert(table, Value::Object(row), self.bearer)
            .await?;
        first_row(table, stored)?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("{table}: insert returned no row"))
        })
    }

    /// Insert a row the caller cannot read back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Remote` if the insert fails.
    pub async fn insert_without_return<D: Serialize>(
        &self,
        table: Table,
        draft: &D,
    ) -> Result<(), RepositoryError> {
        let row = to_row(table, draft)?;
        self.service
            .insert_without_return(table, Value::Object(row), self.bearer)
            .await?;
        Ok(())
    }

    /// Patch every row matching `filters`, returning the first updated row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Remote` if the update fails.
    pub async fn update_where<T: DeserializeOwned>(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Map<String, Value>,
    ) -> Result<Option<T>, RepositoryError> {
        let updated = self
            .service
            .update(table, filters, Value::Object(patch), self.bearer)
            .await?;
        first_row(table, updated)
    }

    /// Insert a new entity from its draft.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Remote` if the insert fails.
    pub async fn create<E: Entity>(&self, draft: &E::Draft) -> Result<E, RepositoryError> {
        self.insert(E::TABLE, to_row(E::TABLE, draft)?).await
    }

    /// Replace an entity's fields with `draft`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has `id`.
    pub async fn update<E: Entity>(
        &self,
        id: E::Id,
        draft: &E::Draft,
    ) -> Result<E, RepositoryError> {
        self.update_where(E::TABLE, &[Filter::eq("id", id)], to_row(E::TABLE, draft)?)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("{} {id}", E::TABLE)))
    }

    /// Delete exactly the row with `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has `id`.
    pub async fn delete<E: Entity>(&self, id: E::Id) -> Result<(), RepositoryError> {
        let removed = self
            .service
            .delete(E::TABLE, &[Filter::eq("id", id)], self.bearer)
            .await?;
        if removed.is_empty() {
            return Err(RepositoryError::NotFound(format!("{} {id}", E::TABLE)));
        }
        Ok(())
    }
}

pub(crate) fn decode<T: DeserializeOwned>(table: Table, row: Value) -> Result<T, RepositoryError> {
    serde_json::from_value(row)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid row in {table}: {e}")))
}

fn first_row<T: DeserializeOwned>(
    table: Table,
    rows: Vec<Value>,
) -> Result<Option<T>, RepositoryError> {
    rows.into_iter().next().map(|row| decode(table, row)).transpose()
}

/// Serialize a draft into a JSON object for writing.
fn to_row<D: Serialize>(table: Table, draft: &D) -> Result<Map<String, Value>, RepositoryError> {
    match serde_json::to_value(draft) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(RepositoryError::DataCorruption(format!(
            "{table}: draft serialized to {other}, expected an object"
        ))),
        Err(e) => Err(RepositoryError::DataCorruption(format!("{table}: {e}"))),
    }
}
