//! Connection factory with retry
//!
//! [`ConnectionFactory::open`] reads a store section, then attempts
//! connect + `PING` up to `max_retries` times, sleeping
//! `initial_delay * 2^attempt` between failed attempts.

use crate::adapters::store::spec::ConnectionSpec;
use crate::adapters::store::traits::{KeyValueStore, StoreConnector};
use crate::config::document::ConfigAccessor;
use crate::config::schema::{RetryConfig, StoreSettings};
use crate::domain::{AilError, Result};

/// Opens verified store connections
#[derive(Debug, Clone)]
pub struct ConnectionFactory<C> {
    connector: C,
    retry: RetryConfig,
}

impl<C: StoreConnector> ConnectionFactory<C> {
    /// Factory with the default retry policy (3 attempts, 1 s initial delay)
    pub fn new(connector: C) -> Self {
        Self::with_retry(connector, RetryConfig::default())
    }

    /// Factory with an explicit retry policy
    pub fn with_retry(connector: C, retry: RetryConfig) -> Self {
        Self { connector, retry }
    }

    /// Retry policy in use
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Opens the store configured in section `name`
    ///
    /// # Errors
    ///
    /// Configuration errors for a missing or malformed section are returned
    /// without any attempt; connection failures end in
    /// [`AilError::ConnectionExhausted`].
    pub async fn open(
        &self,
        config: &(dyn ConfigAccessor + Sync),
        name: &str,
    ) -> Result<C::Handle> {
        let settings = StoreSettings::from_config(config, name)?;
        self.open_spec(name, &ConnectionSpec::from(&settings)).await
    }

    /// Opens a store from explicit parameters
    ///
    /// # Errors
    ///
    /// [`AilError::ConnectionExhausted`] carrying the last failure once every
    /// attempt has failed.
    pub async fn open_spec(&self, name: &str, spec: &ConnectionSpec) -> Result<C::Handle> {
        let max_attempts = self.retry.max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 0..max_attempts {
            match self.attempt(spec).await {
                Ok(handle) => {
                    tracing::info!(
                        store = name,
                        target = %spec,
                        attempt = attempt + 1,
                        "Connected to store"
                    );
                    return Ok(handle);
                }
                Err(e) => {
                    crate::log_retry_attempt!(name, attempt + 1, max_attempts, e);
                    last_error = e.to_string();

                    if attempt + 1 < max_attempts {
                        tokio::time::sleep(self.retry.backoff(attempt)).await;
                    }
                }
            }
        }

        Err(AilError::ConnectionExhausted {
            name: name.to_string(),
            attempts: max_attempts,
            last_error,
        })
    }

    async fn attempt(&self, spec: &ConnectionSpec) -> Result<C::Handle> {
        let handle = self.connector.connect(spec).await?;
        handle.ping().await?;
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::document::ConfigDocument;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Clone, Debug)]
    struct Handle;

    #[async_trait]
    impl KeyValueStore for Handle {
        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        async fn hset(&self, _key: &str, _field: &str, _value: &str) -> Result<()> {
            Ok(())
        }

        async fn hget(&self, _key: &str, _field: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    /// Fails the first `failures` connects
    #[derive(Clone, Default)]
    struct Flaky {
        failures: usize,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl StoreConnector for Flaky {
        type Handle = Handle;

        async fn connect(&self, _spec: &ConnectionSpec) -> Result<Handle> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(AilError::Connection(format!("refused #{call}")))
            } else {
                Ok(Handle)
            }
        }
    }

    fn spec() -> ConnectionSpec {
        ConnectionSpec {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            password: None,
            ssl: false,
            ssl_verify: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_max_retries_with_doubling_waits() {
        let connector = Flaky {
            failures: usize::MAX,
            ..Flaky::default()
        };
        let calls = connector.calls.clone();
        let factory = ConnectionFactory::new(connector);

        let started = Instant::now();
        let err = factory.open_spec("Redis_Cache", &spec()).await.unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        match err {
            AilError::ConnectionExhausted {
                name,
                attempts,
                last_error,
            } => {
                assert_eq!(name, "Redis_Cache");
                assert_eq!(attempts, 3);
                assert!(last_error.contains("refused #2"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_later_attempt() {
        let connector = Flaky {
            failures: 1,
            ..Flaky::default()
        };
        let calls = connector.calls.clone();
        let factory = ConnectionFactory::new(connector);

        let started = Instant::now();
        factory.open_spec("Kvrocks_DB", &spec()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(started.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_missing_section_fails_without_attempts() {
        let connector = Flaky::default();
        let calls = connector.calls.clone();
        let factory = ConnectionFactory::new(connector);

        let err = factory
            .open(&ConfigDocument::new(), "Redis_Log")
            .await
            .unwrap_err();
        assert!(matches!(err, AilError::SectionNotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
