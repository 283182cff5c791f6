//! Estate sale listings.

use frontier_core::{Sale, SaleDraft, SaleId, SaleStatus};
use serde_json::Value;

use super::{Db, Entity, RepositoryError, decode};
use crate::remote::{Select, Table};

impl Entity for Sale {
    type Id = SaleId;
    type Draft = SaleDraft;

    const TABLE: Table = Table::Sales;

    fn id(&self) -> SaleId {
        self.id
    }
}

/// Repository for the `sales` table.
pub struct SaleRepository<'a> {
    db: Db<'a>,
}

impl<'a> SaleRepository<'a> {
    #[must_use]
    pub const fn new(db: Db<'a>) -> Self {
        Self { db }
    }

    /// All sales, newest first. Rows with an unknown status are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> Result<Vec<Sale>, RepositoryError> {
        self.db.fetch_all(&newest_first()).await
    }

    /// All sales, newest first, for editing.
    ///
    /// A row with an unknown status is kept with the default status and the
    /// stored text in [`Sale::unrecognized_status`], so saving the form
    /// writes a valid status over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_editing(&self) -> Result<Vec<Sale>, RepositoryError> {
        let rows = self.db.fetch_rows(&newest_first()).await?;
        Ok(rows.into_iter().filter_map(decode_for_editing).collect())
    }
}

fn newest_first() -> Select {
    Select::from_table(Table::Sales).order_desc("created_at")
}

fn decode_for_editing(mut row: Value) -> Option<Sale> {
    let unrecognized = match row.get("status") {
        Some(Value::String(raw)) if raw.parse::<SaleStatus>().is_err() => Some(raw.clone()),
        _ => None,
    };
    if let (Some(_), Some(object)) = (&unrecognized, row.as_object_mut()) {
        object.insert(
            "status".to_string(),
            Value::String(SaleStatus::default().as_str().to_string()),
        );
    }

    match decode::<Sale>(Table::Sales, row) {
        Ok(mut sale) => {
            if let Some(raw) = &unrecognized {
                tracing::warn!(id = %sale.id, status = %raw, "Sale has an unknown status");
            }
            sale.unrecognized_status = unrecognized;
            Some(sale)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Skipping undecodable sale");
            None
        }
    }
}
