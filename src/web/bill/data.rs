use std::sync::{Mutex, PoisonError};

use anyhow::anyhow;
use serde::Deserialize;

use crate::{db::bill::BillRecord, web::bill::container::Presenter};

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBill {
    pub id: String,
    pub name: String,
    pub expense_type: String,
    pub date: String,
    pub amount: f64,
    pub status: String,
    pub file_url: Option<String>,
}

impl From<BillRecord> for DisplayBill {
    fn from(record: BillRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            expense_type: record.expense_type,
            date: record.date,
            amount: record.amount,
            status: record.status,
            file_url: record.file_url,
        }
    }
}

/// The `data-bill-url` carried by an `icon-eye` element
#[derive(Debug, Clone)]
pub struct ReceiptTrigger {
    pub bill_url: url::Url,
}

impl ReceiptTrigger {
    pub fn parse(bill_url: &str) -> Result<Self, anyhow::Error> {
        let bill_url = url::Url::parse(bill_url)?;
        if bill_url.scheme() != "https" && bill_url.scheme() != "http" {
            return Err(anyhow!("Only HTTP(S) receipt urls are allowed"));
        }
        Ok(Self { bill_url })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptQuery {
    pub url: String,
}

/// Holds the receipt the container asked to show, rendered as a modal afterwards
#[derive(Debug, Default)]
pub struct ReceiptModal {
    shown: Mutex<Option<url::Url>>,
}

impl ReceiptModal {
    pub fn into_shown(self) -> Option<url::Url> {
        self.shown.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Presenter for ReceiptModal {
    fn show_receipt(&self, url: &url::Url) {
        *self.shown.lock().unwrap_or_else(PoisonError::into_inner) = Some(url.clone());
    }
}
