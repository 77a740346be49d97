/// Application context and dependency injection
use crate::{
    config::ServerConfig,
    db,
    error::ApiResult,
    keys::KeyBroker,
    store::RecordStore,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
///
/// The store gateway and key broker are constructed here and injected into
/// the request-handling layer; nothing reaches for process-global state.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub store: RecordStore,
    pub broker: KeyBroker,
    /// API key derived once at startup; empty when the store was down or the
    /// stored key failed verification. Does not refresh until restart.
    pub api_key: Arc<String>,
}

impl AppContext {
    /// Create a new application context from configuration
    ///
    /// A store that cannot be opened degrades the context to the
    /// disconnected state instead of failing startup.
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        config.validate()?;

        let pool = match Self::open_store(&config).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                tracing::error!(error = %e, "store connection failed, serving disconnected");
                None
            }
        };

        Self::from_pool(config, pool).await
    }

    /// Wire the context from an already-opened pool (or none). Used by
    /// `new` and by tests that bring their own in-memory store.
    pub async fn from_pool(config: ServerConfig, pool: Option<SqlitePool>) -> ApiResult<Self> {
        let store = match pool.clone() {
            Some(pool) => RecordStore::new(pool),
            None => RecordStore::disconnected(),
        };

        let broker = KeyBroker::new(pool, &config.authentication);

        // Fetched once per process; see the api_key field note
        let api_key = broker.stored_key().await.unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("no verified API key available, protected routes will reject");
        }

        Ok(Self {
            config: Arc::new(config),
            store,
            broker,
            api_key: Arc::new(api_key),
        })
    }

    async fn open_store(config: &ServerConfig) -> ApiResult<SqlitePool> {
        let pool = db::create_pool(
            &config.storage.db_location,
            db::DatabaseOptions::default(),
        )
        .await?;

        db::init_schema(&pool).await?;
        db::test_connection(&pool).await?;

        Ok(pool)
    }
}
