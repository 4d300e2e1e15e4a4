use std::sync::Arc;

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use serde::Deserialize;
use tokio_postgres::NoTls;

use crate::{
    Config,
    db::{api::ApiStore, bill::BillStore, memory::InMemBillStore},
};

pub mod api;
pub mod bill;
pub mod memory;

/// Which backend serves the bills list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Api,
    Memory,
    None,
}

/// The store handed to the bills container. `Absent` means there is nothing to fetch.
#[derive(Clone)]
pub enum StoreRef {
    Connected(Arc<dyn BillStore>),
    Absent,
}

impl StoreRef {
    pub fn connected(store: impl BillStore + 'static) -> Self {
        Self::Connected(Arc::new(store))
    }

    pub async fn from_config(cfg: &Config) -> Result<Self, anyhow::Error> {
        let store = match cfg.store_backend {
            StoreBackend::Postgres => {
                let db = PostgresStore::new(&cfg.db_connection_string()).await?;
                db.init().await?;
                Self::connected(db)
            }
            StoreBackend::Api => {
                let api_url = cfg
                    .api_url
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("store_backend = \"api\" requires api_url"))?;
                Self::connected(ApiStore::new(api_url, cfg.api_token.clone())?)
            }
            StoreBackend::Memory => Self::connected(InMemBillStore::with_bills(memory::demo_bills())),
            StoreBackend::None => Self::Absent,
        };
        Ok(store)
    }
}

impl std::fmt::Debug for StoreRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreRef::Connected(_) => f.write_str("StoreRef::Connected"),
            StoreRef::Absent => f.write_str("StoreRef::Absent"),
        }
    }
}

pub struct PostgresStore {
    pub pool: Pool,
}

impl PostgresStore {
    pub async fn new(conn_str: &str) -> Result<Self, anyhow::Error> {
        let cfg: tokio_postgres::Config = conn_str.parse()?;
        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let pool = Pool::builder(Manager::from_config(cfg, NoTls, mgr_config))
            .max_size(16)
            .build()?;

        Ok(Self { pool })
    }

    pub async fn init(&self) -> Result<(), anyhow::Error> {
        // date is free text: rows written by older clients are not guaranteed to parse
        let qry = r#"
            CREATE TABLE IF NOT EXISTS bills (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                email TEXT NOT NULL,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                date TEXT NOT NULL,
                amount DOUBLE PRECISION NOT NULL,
                vat TEXT NOT NULL DEFAULT '',
                pct INTEGER NOT NULL DEFAULT 20,
                commentary TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'pending',
                file_url TEXT,
                file_name TEXT,
                comment_admin TEXT,
                created_at TIMESTAMPTZ DEFAULT (NOW() AT TIME ZONE 'UTC')
            )
        "#;
        self.pool.get().await?.execute(qry, &[]).await?;
        Ok(())
    }
}
