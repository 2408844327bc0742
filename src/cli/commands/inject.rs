//! `inject-lacus-url` command implementation

use crate::adapters::store::{ConnectionFactory, RedisConnector};
use crate::core::inject::{inject_lacus_url, InjectionSettings, LACUS_FIELD, LACUS_KEY};
use clap::Args;

/// Arguments for the inject-lacus-url command
#[derive(Args, Debug)]
pub struct InjectArgs {}

impl InjectArgs {
    /// Execute the injection; exit code 0 on success, 1 on any failure
    pub async fn execute(&self) -> anyhow::Result<i32> {
        println!("🚀 Starting LACUS URL injection...");

        let settings = match InjectionSettings::from_env() {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(&e, "Invalid injection settings");
                println!("❌ LACUS URL injection failed");
                println!("   Error: {e}");
                return Ok(1);
            }
        };

        let factory = ConnectionFactory::new(RedisConnector::new());
        match inject_lacus_url(&factory, &settings).await {
            Ok(()) => {
                println!(
                    "✅ LACUS URL injected into {LACUS_KEY} {LACUS_FIELD}: {}",
                    settings.lacus_url
                );
                Ok(0)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "LACUS URL injection failed");
                println!("❌ LACUS URL injection failed");
                println!("   Error: {e}");
                Ok(1)
            }
        }
    }
}
