//! Singleton settings: the active business info and social links rows.

use frontier_core::{BusinessInfo, BusinessInfoDraft, SocialLinks, SocialLinksDraft};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use super::{Db, RepositoryError, decode, to_row};
use crate::remote::{Filter, Select, Table};

/// Repository for the two singleton settings tables.
pub struct SettingsRepository<'a> {
    db: Db<'a>,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(db: Db<'a>) -> Self {
        Self { db }
    }

    /// The active business info row, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn active_business_info(&self) -> Result<Option<BusinessInfo>, RepositoryError> {
        self.active_row(Table::BusinessInfo).await
    }

    /// The active social links row, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn active_social_links(&self) -> Result<Option<SocialLinks>, RepositoryError> {
        self.active_row(Table::SocialLinks).await
    }

    /// The first active row of `table`. Extra active rows are logged; the
    /// next replacement deactivates them.
    async fn active_row<T: DeserializeOwned>(
        &self,
        table: Table,
    ) -> Result<Option<T>, RepositoryError> {
        let mut rows = self.db.fetch_rows(&active(table)).await?;
        if rows.len() > 1 {
            tracing::warn!(table = %table, count = rows.len(), "Several active rows");
        }
        rows.truncate(1);
        rows.pop().map(|row| decode(table, row)).transpose()
    }

    /// Replace the active business info.
    ///
    /// # Errors
    ///
    /// Returns an error if any remote call fails.
    pub async fn replace_business_info(
        &self,
        draft: &BusinessInfoDraft,
    ) -> Result<BusinessInfo, RepositoryError> {
        self.replace_active(Table::BusinessInfo, draft).await
    }

    /// Replace the active social links.
    ///
    /// # Errors
    ///
    /// Returns an error if any remote call fails.
    pub async fn replace_social_links(
        &self,
        draft: &SocialLinksDraft,
    ) -> Result<SocialLinks, RepositoryError> {
        self.replace_active(Table::SocialLinks, draft).await
    }

    /// Write `draft` as the single active row of `table`.
    ///
    /// The first active row is updated in place, guarded on
    /// `is_active = true` so a concurrent replacement cannot leave two active
    /// rows. Only when there is no active row (or the guarded update matched
    /// nothing) is a fresh active row inserted. Any other rows still marked
    /// active are then deactivated, which is the only case that issues a
    /// second write.
    #[instrument(skip(self, draft), fields(table = %table))]
    async fn replace_active<T, D>(&self, table: Table, draft: &D) -> Result<T, RepositoryError>
    where
        T: DeserializeOwned,
        D: Serialize + Sync,
    {
        let mut row = to_row(table, draft)?;
        row.insert("is_active".to_string(), Value::Bool(true));

        let current = self.db.fetch_rows(&active(table)).await?;
        let current_ids: Vec<String> = current
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_str))
            .map(str::to_owned)
            .collect();

        let updated = match current_ids.first() {
            Some(id) => {
                let filters = [Filter::eq("id", id), Filter::eq("is_active", true)];
                let updated = self.db.update_where(table, &filters, row.clone()).await?;
                if updated.is_none() {
                    tracing::warn!("Active row changed during replacement, inserting a new one");
                }
                updated
            }
            None => None,
        };
        let kept: Value = match updated {
            Some(kept) => kept,
            None => self.db.insert(table, row).await?,
        };

        let kept_id = kept.get("id").and_then(Value::as_str).unwrap_or_default();
        if current_ids.iter().any(|id| id != kept_id) {
            tracing::warn!(count = current_ids.len(), "Deactivating duplicate active rows");
            let mut patch = serde_json::Map::new();
            patch.insert("is_active".to_string(), Value::Bool(false));
            let filters = [Filter::eq("is_active", true), Filter::neq("id", kept_id)];
            self.db.update_where::<Value>(table, &filters, patch).await?;
        }

        decode(table, kept)
    }
}

fn active(table: Table) -> Select {
    Select::from_table(table).eq("is_active", true)
}
