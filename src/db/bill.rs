use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_postgres::Row;
use tracing::error;
use uuid::Uuid;

use crate::db::PostgresStore;

/// A bill as the backend stores it. `date` is free text and may not parse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    #[serde(default)]
    pub email: String,
    pub date: String,
    pub amount: f64,
    #[serde(default)]
    pub vat: String,
    #[serde(default)]
    pub pct: u32,
    #[serde(default)]
    pub commentary: String,
    pub status: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub comment_admin: Option<String>,
}

/// Failure of a store `list()` call. The message is shown to the user as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Erreur {0}")]
    Status(u16),
    #[error("{0}")]
    Backend(String),
}

#[async_trait]
pub trait BillStore: Send + Sync {
    /// All bills, in the order the backend returns them
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError>;
}

#[async_trait]
impl BillStore for PostgresStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        let rows = self
            .pool
            .get()
            .await
            .map_err(|e| {
                error!("Error getting a db connection: {e}");
                StoreError::Backend("Erreur 500".to_string())
            })?
            .query(
                "SELECT id, name, type, email, date, amount, vat, pct, commentary, status, file_url, file_name, comment_admin FROM bills ORDER BY date DESC",
                &[],
            )
            .await
            .map_err(|e| {
                error!("Error fetching bills: {e}");
                StoreError::Backend("Erreur 500".to_string())
            })?;

        let res: Result<Vec<BillRecord>, anyhow::Error> = rows.iter().map(row_to_bill).collect();

        res.map_err(|e| {
            error!("Error reading bill row: {e}");
            StoreError::Backend("Erreur 500".to_string())
        })
    }
}

fn row_to_bill(row: &Row) -> Result<BillRecord, anyhow::Error> {
    let id: Uuid = row.try_get(0)?;
    let pct: i32 = row.try_get(7)?;

    Ok(BillRecord {
        id: id.to_string(),
        name: row.try_get(1)?,
        expense_type: row.try_get(2)?,
        email: row.try_get(3)?,
        date: row.try_get(4)?,
        amount: row.try_get(5)?,
        vat: row.try_get(6)?,
        pct: u32::try_from(pct)?,
        commentary: row.try_get(8)?,
        status: row.try_get(9)?,
        file_url: row.try_get(10)?,
        file_name: row.try_get(11)?,
        comment_admin: row.try_get(12)?,
    })
}
