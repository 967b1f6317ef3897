use deadpool_postgres::{Object, Pool, Runtime};
use tokio_postgres::NoTls;

use crate::config::StoreConfig;
use crate::error::StoreError;

/// Shared connection pool for the relational store.
///
/// Creating the pool does not connect; the first checkout opens a connection and later
/// checkouts reuse idle ones. Cloning is cheap and every clone shares the same pool,
/// so one `StorePool` can serve any number of concurrent calls.
#[derive(Clone, Debug)]
pub struct StorePool {
    pool: Pool,
}

impl StorePool {
    /// Build a pool from a validated configuration.
    ///
    /// # Errors
    /// Returns `StoreError::ConfigError` if required config fields are missing or the pool
    /// cannot be created from them.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;

        let pool = config
            .to_pg_config()
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| StoreError::ConfigError(format!("Failed to create Postgres pool: {e}")))?;

        tracing::debug!(
            host = config.host.as_deref().unwrap_or_default(),
            port = config.port,
            dbname = config.dbname.as_deref().unwrap_or_default(),
            max_size = config.pool_max_size,
            "created store pool"
        );

        Ok(Self { pool })
    }

    /// Check out a pooled connection.
    ///
    /// # Errors
    /// Returns `StoreError::Pool` if the store is unreachable, the wait timeout elapses,
    /// or the pool has been closed.
    pub async fn get_connection(&self) -> Result<Object, StoreError> {
        self.pool.get().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to check out a store connection");
            StoreError::Pool(e)
        })
    }

    /// Close the pool. Idle connections are dropped now, checked-out ones when they
    /// are returned, and every later checkout fails.
    pub fn close(&self) {
        self.pool.close();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Connections currently open (idle or checked out).
    #[must_use]
    pub fn size(&self) -> usize {
        self.pool.status().size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StoreConfig {
        StoreConfig {
            host: Some("localhost".into()),
            user: Some("labber".into()),
            password: Some("123".into()),
            dbname: Some("lightbnb".into()),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn pool_creation_is_lazy() {
        let pool = StorePool::new(&config()).unwrap();
        assert_eq!(pool.size(), 0);
        assert!(!pool.is_closed());
    }

    #[test]
    fn invalid_config_never_builds_a_pool() {
        let mut cfg = config();
        cfg.host = None;
        assert!(matches!(
            StorePool::new(&cfg),
            Err(StoreError::ConfigError(msg)) if msg == "host is required"
        ));
    }

    #[tokio::test]
    async fn closed_pool_refuses_checkout() {
        let pool = StorePool::new(&config()).unwrap();
        pool.close();
        assert!(pool.is_closed());
        let err = pool.get_connection().await.unwrap_err();
        assert!(err.is_transport_failure());
    }
}
