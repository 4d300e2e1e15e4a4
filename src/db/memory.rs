use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::bill::{BillRecord, BillStore, StoreError};

/// Keeps bills in process, in insertion order
#[derive(Default, Clone, Debug)]
pub struct InMemBillStore(Arc<RwLock<Vec<BillRecord>>>);

impl InMemBillStore {
    pub fn with_bills(bills: Vec<BillRecord>) -> Self {
        Self(Arc::new(RwLock::new(bills)))
    }
}

#[async_trait]
impl BillStore for InMemBillStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        Ok(self.0.read().await.clone())
    }
}

fn demo_bill(
    id: &str,
    name: &str,
    expense_type: &str,
    date: &str,
    amount: f64,
    status: &str,
) -> BillRecord {
    BillRecord {
        id: id.to_owned(),
        name: name.to_owned(),
        expense_type: expense_type.to_owned(),
        email: "employee@test.tld".to_owned(),
        date: date.to_owned(),
        amount,
        vat: "70".to_owned(),
        pct: 20,
        commentary: String::new(),
        status: status.to_owned(),
        file_url: Some(format!("https://test.storage.tld/receipts/{id}.jpg")),
        file_name: Some(format!("{id}.jpg")),
        comment_admin: None,
    }
}

/// Seed data for the memory backend, newest first
pub fn demo_bills() -> Vec<BillRecord> {
    vec![
        demo_bill("47qAXb6fIm2zOKkLzMro", "encore", "Hôtel et logement", "2004-04-04", 400.0, "pending"),
        demo_bill("BeKy5Mo4jkmdfPGYpTxZ", "test1", "Services en ligne", "2003-03-03", 100.0, "refused"),
        demo_bill("UIUZtnPQvnbFnB0ozvJh", "test3", "Services en ligne", "2002-02-02", 300.0, "accepted"),
        demo_bill("qcCK3SzECmaZAGRrHjaC", "test2", "Restaurants et bars", "2001-01-01", 200.0, "refused"),
    ]
}

/// A store whose `list()` always fails with the given error
#[cfg(test)]
pub struct FailingBillStore(pub fn() -> StoreError);

#[cfg(test)]
#[async_trait]
impl BillStore for FailingBillStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        Err((self.0)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let store = InMemBillStore::with_bills(demo_bills());
        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|b| b.id).collect();
        let expected: Vec<String> = demo_bills().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn every_list_call_returns_fresh_records() {
        let store = InMemBillStore::with_bills(demo_bills());
        let mut first = store.list().await.unwrap();
        first[0].date = "mutated".to_owned();
        let second = store.list().await.unwrap();
        assert_eq!(second[0].date, "2004-04-04");
    }

    #[test]
    fn demo_bills_are_newest_first() {
        let dates: Vec<String> = demo_bills().into_iter().map(|b| b.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }
}
