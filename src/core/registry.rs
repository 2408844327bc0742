//! Process-wide registry of store connections
//!
//! One lazily opened handle per [`StoreName`]. First access runs the
//! connection factory behind a per-name [`OnceCell`], so concurrent callers
//! share a single open; a failed open leaves the cell empty and the next
//! access retries.

use crate::adapters::store::{ConnectionFactory, StoreConnector};
use crate::config::document::ConfigAccessor;
use crate::domain::store::STORE_COUNT;
use crate::domain::{Result, StoreName};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;

type Cells<H> = [Arc<OnceCell<H>>; STORE_COUNT];

/// Lazily populated map from store name to connection handle
pub struct ConnectionRegistry<C: StoreConnector> {
    factory: ConnectionFactory<C>,
    config: Arc<dyn ConfigAccessor + Send + Sync>,
    cells: Mutex<Cells<C::Handle>>,
}

/// Availability of one store after [`ConnectionRegistry::connect_all`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StoreStatus {
    Available,
    Unavailable { error: String },
}

impl StoreStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, StoreStatus::Available)
    }
}

/// Per-store outcome of a startup connection pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    pub stores: Vec<(StoreName, StoreStatus)>,
}

impl AvailabilityReport {
    /// Number of stores that connected
    pub fn available_count(&self) -> usize {
        self.stores.iter().filter(|(_, s)| s.is_available()).count()
    }

    /// Whether every store connected
    pub fn all_available(&self) -> bool {
        self.available_count() == self.stores.len()
    }

    /// Status of one store, if it was attempted
    pub fn status(&self, name: StoreName) -> Option<&StoreStatus> {
        self.stores
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, status)| status)
    }
}

impl<C: StoreConnector> ConnectionRegistry<C> {
    pub fn new(
        factory: ConnectionFactory<C>,
        config: Arc<dyn ConfigAccessor + Send + Sync>,
    ) -> Self {
        Self {
            factory,
            config,
            cells: Mutex::new(fresh_cells()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cells<C::Handle>> {
        self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the handle for `name`, opening it on first use
    ///
    /// # Errors
    ///
    /// Returns the factory error; nothing is cached on failure.
    pub async fn get(&self, name: StoreName) -> Result<C::Handle> {
        let cell = Arc::clone(&self.lock()[name.index()]);
        let handle = cell
            .get_or_try_init(|| async {
                self.factory
                    .open(self.config.as_ref(), name.section())
                    .await
            })
            .await?;
        Ok(handle.clone())
    }

    /// Whether `name` currently holds a handle
    pub fn is_connected(&self, name: StoreName) -> bool {
        self.lock()[name.index()].initialized()
    }

    /// Opens every store, logging a warning for each failure
    pub async fn connect_all(&self) -> AvailabilityReport {
        let mut report = AvailabilityReport::default();

        for name in StoreName::ALL {
            let status = match self.get(name).await {
                Ok(_) => StoreStatus::Available,
                Err(e) => {
                    tracing::warn!(store = %name, error = %e, "Store unavailable");
                    StoreStatus::Unavailable {
                        error: e.to_string(),
                    }
                }
            };
            report.stores.push((name, status));
        }

        tracing::info!(
            available = report.available_count(),
            total = report.stores.len(),
            "Store connection pass complete"
        );
        report
    }

    /// Drops every cached handle
    pub fn reset(&self) {
        *self.lock() = fresh_cells();
        tracing::debug!("Cleared all store connections");
    }

    /// Drops the cached handle for `name`
    pub fn clear(&self, name: StoreName) {
        self.lock()[name.index()] = Arc::new(OnceCell::new());
        tracing::debug!(store = %name, "Cleared store connection");
    }
}

fn fresh_cells<H>() -> Cells<H> {
    std::array::from_fn(|_| Arc::new(OnceCell::new()))
}
