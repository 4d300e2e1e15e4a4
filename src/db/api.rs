use async_trait::async_trait;
use tracing::error;

use crate::db::bill::{BillRecord, BillStore, StoreError};

/// Bills served by a remote REST backend at `{base_url}bills`
pub struct ApiStore {
    client: reqwest::Client,
    bills_url: url::Url,
    token: Option<String>,
}

impl ApiStore {
    pub fn new(base_url: url::Url, token: Option<String>) -> Result<Self, anyhow::Error> {
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(anyhow::anyhow!("Only HTTP(S) api urls are allowed"));
        }
        let bills_url = base_url.join("bills")?;
        Ok(Self {
            client: reqwest::Client::new(),
            bills_url,
            token,
        })
    }
}

#[async_trait]
impl BillStore for ApiStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        let mut req = self.client.get(self.bills_url.clone());
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| {
            error!("Error requesting bills from {}: {e}", self.bills_url);
            StoreError::Backend("Could not reach the bills api".to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            error!("Bills api {} answered {status}", self.bills_url);
            return Err(StoreError::Status(status.as_u16()));
        }

        resp.json::<Vec<BillRecord>>().await.map_err(|e| {
            error!("Error decoding bills from {}: {e}", self.bills_url);
            StoreError::Backend("Invalid bills api response".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bills_url_is_joined_on_base() {
        let store = ApiStore::new(url::Url::parse("http://localhost:5678/").unwrap(), None).unwrap();
        assert_eq!(store.bills_url.as_str(), "http://localhost:5678/bills");
    }

    #[test]
    fn rejects_non_http_base() {
        let res = ApiStore::new(url::Url::parse("file:///tmp/bills").unwrap(), None);
        assert!(res.is_err());
    }
}
