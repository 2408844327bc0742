//! Store abstraction traits
//!
//! The connection factory, the registry and the injector only talk to these
//! traits, so they run unchanged against Redis/Kvrocks or an in-memory double.

use crate::adapters::store::spec::ConnectionSpec;
use crate::domain::Result;
use async_trait::async_trait;

/// Operations issued against an open store connection
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Liveness probe (`PING`)
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not answer.
    async fn ping(&self) -> Result<()>;

    /// Sets a hash field (`HSET key field value`)
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()>;

    /// Reads a hash field (`HGET key field`); `None` when absent
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;
}

/// Opens store connections from a [`ConnectionSpec`]
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Connection handle; cheap to clone and shared by every caller
    type Handle: KeyValueStore + Clone + Send + Sync + 'static;

    /// Opens one connection. No retries happen at this level.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    async fn connect(&self, spec: &ConnectionSpec) -> Result<Self::Handle>;
}
