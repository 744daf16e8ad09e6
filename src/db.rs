//! Database connection management
//!
//! Builds the PostgreSQL pool and opens the document store the handlers
//! run against.

pub mod collection;
pub mod memory;
pub mod postgres;
pub mod queries;
pub mod store;

pub use collection::{Collection, Record};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use store::{CollectionSpec, Document, DocumentStore, Filter, StoreError, Update};

use crate::config::{DatabaseConfig, Settings, StorageBackend};
use crate::error::AppError;
use crate::models::COLLECTIONS;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use std::sync::Arc;
use tokio_postgres::NoTls;
use tracing::{info, warn};

/// Create a connection pool, over TLS when the host requires it
pub fn create_pool(config: &DatabaseConfig) -> Result<Pool, AppError> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.database.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(config.max_pool_size));

    if config.require_tls {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

        cfg.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| AppError::Config(format!("Failed to create TLS pool: {}", e)))
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| AppError::Config(format!("Failed to create pool: {}", e)))
    }
}

/// Open the configured document store with every collection ready to use
pub async fn open_store(settings: &Settings) -> Result<Arc<dyn DocumentStore>, AppError> {
    match settings.storage {
        StorageBackend::Memory => {
            warn!("⚠️  Using the in-memory store: data is lost on restart");
            Ok(Arc::new(MemoryDocumentStore::new(COLLECTIONS)))
        }
        StorageBackend::Postgres => {
            let pool = create_pool(&settings.database)?;

            // Test the connection
            let client = pool.get().await.map_err(StoreError::from)?;
            client
                .query_one("SELECT 1", &[])
                .await
                .map_err(StoreError::from)?;
            drop(client);

            info!(
                "✅ Database connection successful ({}:{}/{}, TLS: {})",
                settings.database.host,
                settings.database.port,
                settings.database.database,
                settings.database.require_tls
            );

            let store = PgDocumentStore::new(pool, COLLECTIONS)?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}
