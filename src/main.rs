use axum::extract::FromRef;
use config::{Environment, File};
use std::{net::SocketAddr, str::FromStr};
use tower_sessions::MemoryStore;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{Layer, layer::SubscriberExt};

use crate::db::{StoreBackend, StoreRef};

mod db;
mod web;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    pub address: std::net::SocketAddr,
    pub domain: String,
    pub cookie_secure: bool,
    pub log_level: String,
    pub store_backend: StoreBackend,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_host: String,
    pub api_url: Option<url::Url>,
    pub api_token: Option<String>,
}

impl Config {
    pub fn db_connection_string(&self) -> String {
        let db_name = if self.db_name.is_empty() {
            "".to_string()
        } else {
            format!("/{}", self.db_name)
        };
        format!(
            "postgres://{}:{}@{}?host={}",
            self.db_user, self.db_password, db_name, self.db_host
        )
    }
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(File::with_name(&format!(
                "{}/config/config.toml",
                env!("CARGO_MANIFEST_DIR")
            )))
            .add_source(Environment::with_prefix("BILLED").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Clone, FromRef)]
pub struct Ctx {
    pub store: StoreRef,
    pub session_store: MemoryStore,
}

impl Ctx {
    pub async fn new(cfg: &Config) -> Result<Self, anyhow::Error> {
        let store = StoreRef::from_config(cfg).await?;
        info!("Bills store: {:?} ({store:?})", cfg.store_backend);

        Ok(Self {
            store,
            session_store: MemoryStore::default(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cfg = Config::new()?;

    tracing_log::LogTracer::init()?;
    let level_filter = LevelFilter::from_str(&cfg.log_level)?;
    let stdout_log = tracing_subscriber::fmt::layer().with_filter(level_filter);
    let subscriber = tracing_subscriber::registry().with(stdout_log);
    tracing::subscriber::set_global_default(subscriber)?;

    if let Ok(listener) = tokio::net::TcpListener::bind(&cfg.address).await {
        info!(
            "Server running at http://{} with log-level={}",
            cfg.address, cfg.log_level
        );
        let ctx = Ctx::new(&cfg).await?;
        let router = web::router(ctx, &cfg);
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_handler())
        .await?;
    } else {
        error!("Failed to bind to listen address {}", &cfg.address);
    }

    Ok(())
}

async fn shutdown_handler() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("to install ctrl_c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
