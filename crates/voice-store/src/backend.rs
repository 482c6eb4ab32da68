//! Store selection from configuration

use std::sync::Arc;

use tracing::info;
use voice_common::{DatabaseConfig, StoreBackend, StoreConfig};
use voice_core::{DailyTotalStore, DomainError, RepoResult};

use crate::pool::{create_pool, ensure_schema};
use crate::repositories::error::map_db_error;
use crate::repositories::{JsonFileStore, MemoryStore, PgDailyTotalStore};

/// Open the configured backend, creating schema or loading the document as needed
pub async fn open_store(
    store: &StoreConfig,
    database: Option<&DatabaseConfig>,
) -> RepoResult<Arc<dyn DailyTotalStore>> {
    match store.backend {
        StoreBackend::Json => {
            let json = JsonFileStore::open(&store.path).await?;
            info!(path = %json.path().display(), "Using JSON document store");
            Ok(Arc::new(json))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store, history will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let database = database.ok_or_else(|| {
                DomainError::StoreError("postgres backend selected without DATABASE_URL".to_string())
            })?;
            let pool = create_pool(database).await.map_err(map_db_error)?;
            ensure_schema(&pool).await.map_err(map_db_error)?;
            info!(
                max_connections = database.max_connections,
                "Using PostgreSQL store"
            );
            Ok(Arc::new(PgDailyTotalStore::new(pool)))
        }
    }
}
