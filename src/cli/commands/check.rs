//! `check-connections` command implementation

use crate::adapters::store::{ConnectionFactory, RedisConnector, DEFAULT_POOL_SIZE};
use crate::config::{
    process_env, ConfigAccessor, EnvironmentConfig, LegacyConfig, LoadOptions, RetryConfig,
};
use crate::core::registry::{ConnectionRegistry, StoreStatus};
use crate::domain::Result;
use clap::Args;
use std::sync::Arc;

/// Arguments for the check-connections command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Read the single legacy file ($AIL_HOME/configs/azure.cfg or core.cfg)
    #[arg(long)]
    pub legacy: bool,

    /// Connection attempts per store
    #[arg(long, default_value_t = 3)]
    pub max_retries: usize,

    /// Delay before the second attempt, doubled per attempt
    #[arg(long, default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// Pooled connections per store
    #[arg(long, default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: usize,
}

impl CheckArgs {
    /// Execute the check; exit code 0 only if every store is reachable
    pub async fn execute(&self, options: &LoadOptions) -> anyhow::Result<i32> {
        let config = match self.load(options) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(1);
            }
        };

        let retry = RetryConfig {
            max_retries: self.max_retries,
            initial_delay_ms: self.retry_delay_ms,
        };
        let factory = ConnectionFactory::with_retry(
            RedisConnector::new().with_pool_size(self.pool_size),
            retry,
        );
        let registry = ConnectionRegistry::new(factory, config);

        println!("🔌 Checking store connections");
        let report = registry.connect_all().await;
        for (name, status) in &report.stores {
            match status {
                StoreStatus::Available => println!("  ✅ {name}"),
                StoreStatus::Unavailable { error } => println!("  ❌ {name}: {error}"),
            }
        }
        println!(
            "{}/{} stores available",
            report.available_count(),
            report.stores.len()
        );

        Ok(if report.all_available() { 0 } else { 1 })
    }

    fn load(&self, options: &LoadOptions) -> Result<Arc<dyn ConfigAccessor + Send + Sync>> {
        if self.legacy {
            let config = LegacyConfig::load_with(None, &process_env)?;
            Ok(Arc::new(config))
        } else {
            let config = EnvironmentConfig::load_with(options, &process_env)?;
            Ok(Arc::new(config))
        }
    }
}
