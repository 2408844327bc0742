//! Redis/Kvrocks connector backed by a `deadpool-redis` pool

use crate::adapters::store::spec::ConnectionSpec;
use crate::adapters::store::traits::{KeyValueStore, StoreConnector};
use crate::domain::{AilError, Result};
use async_trait::async_trait;
use deadpool_redis::{Config as PoolSettings, Connection, Pool, PoolConfig, Runtime};
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;

/// Connect and IO timeout applied to every operation
pub const STORE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of pooled connections per store
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Opens pooled Redis/Kvrocks connections
#[derive(Debug, Clone)]
pub struct RedisConnector {
    pool_size: usize,
    timeout: Duration,
}

impl RedisConnector {
    /// Connector with the default pool size and the 30 second timeout
    pub fn new() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            timeout: STORE_TIMEOUT,
        }
    }

    /// Overrides the pool size
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }
}

impl Default for RedisConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreConnector for RedisConnector {
    type Handle = RedisStore;

    async fn connect(&self, spec: &ConnectionSpec) -> Result<RedisStore> {
        let mut settings = PoolSettings::from_url(spec.to_url()?.as_str());

        let mut pool_config = PoolConfig::new(self.pool_size);
        pool_config.timeouts.wait = Some(self.timeout);
        pool_config.timeouts.create = Some(self.timeout);
        pool_config.timeouts.recycle = Some(self.timeout);
        settings.pool = Some(pool_config);

        let pool = settings
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AilError::Connection(format!("Failed to create pool for {spec}: {e}")))?;

        let store = RedisStore {
            pool,
            timeout: self.timeout,
        };

        // Force the first connection so unreachable hosts fail here.
        store.connection().await?;
        tracing::debug!(target = %spec, tls = spec.ssl, "Opened store connection pool");
        Ok(store)
    }
}

/// Pooled store handle; clones share the pool
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
    timeout: Duration,
}

impl RedisStore {
    async fn connection(&self) -> Result<Connection> {
        self.bounded(async {
            self.pool
                .get()
                .await
                .map_err(|e| AilError::Connection(format!("Failed to get connection from pool: {e}")))
        })
        .await
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.timeout, operation)
            .await
            .map_err(|_| {
                AilError::Connection(format!(
                    "Store operation timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("pool", &self.pool.status())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        self.bounded(async {
            let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
            if pong.eq_ignore_ascii_case("PONG") {
                Ok(())
            } else {
                Err(AilError::Store(format!("Unexpected PING reply: {pong}")))
            }
        })
        .await
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        self.bounded(async {
            let _: () = conn.hset(key, field, value).await?;
            Ok(())
        })
        .await
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        self.bounded(async {
            let value: Option<String> = conn.hget(key, field).await?;
            Ok(value)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_override() {
        assert_eq!(RedisConnector::new().pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(RedisConnector::new().with_pool_size(4).pool_size, 4);
        assert_eq!(RedisConnector::new().with_pool_size(0).pool_size, 1);
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_on_connect() {
        let spec = ConnectionSpec {
            host: "127.0.0.1".to_string(),
            port: 1,
            db: 0,
            password: None,
            ssl: false,
            ssl_verify: false,
        };
        let result = RedisConnector::new().with_pool_size(2).connect(&spec).await;
        assert!(matches!(result, Err(AilError::Connection(_))));
    }
}
