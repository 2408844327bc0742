// AIL Config - Configuration and store bootstrap for the AIL framework
// Copyright (c) 2025 AIL Contributors
// Licensed under the GNU Affero General Public License v3.0

//! # AIL Config - configuration and store bootstrap
//!
//! Shared plumbing for AIL processes: locating and merging the `.cfg` files,
//! typed reads over them, and opening the Redis/Kvrocks stores they describe.
//!
//! ## Overview
//!
//! This library provides:
//! - **Resolving** the deployment environment and its configuration files
//! - **Loading** layered INI configuration with `${VAR}` substitution
//! - **Connecting** to stores with retry and exponential backoff
//! - **Caching** one connection per logical store for the whole process
//! - **Injecting** the crawler's LACUS URL into the metadata store
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Connection registry and LACUS URL injection
//! - [`adapters`] - Store connectors (Redis/Kvrocks)
//! - [`domain`] - Errors, environments and store names
//! - [`config`] - Configuration resolution, loading and typed settings
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ail_config::adapters::store::{ConnectionFactory, RedisConnector};
//! use ail_config::config::load_config;
//! use ail_config::core::registry::ConnectionRegistry;
//! use ail_config::domain::StoreName;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config(None)?;
//!
//!     let factory = ConnectionFactory::new(RedisConnector::new());
//!     let registry = ConnectionRegistry::new(factory, Arc::new(config));
//!
//!     let report = registry.connect_all().await;
//!     println!("{} stores available", report.available_count());
//!
//!     let cache = registry.get(StoreName::Cache).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Environments
//!
//! The environment is the explicit argument if given, else `DEPLOYMENT_ENV`,
//! else `AIL_ENV`, else `dev-local`. Aliases such as `development`, `staging`
//! and `production` map to the canonical labels:
//!
//! ```rust
//! use ail_config::domain::EnvironmentLabel;
//!
//! let env = EnvironmentLabel::resolve_with(None, |name| {
//!     (name == "AIL_ENV").then(|| "production".to_string())
//! })
//! .unwrap();
//! assert_eq!(env, EnvironmentLabel::ProdCloud);
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`] with a
//! [`domain::AilError`]:
//!
//! ```rust,no_run
//! use ail_config::config::{load_config, ConfigAccessor};
//! use ail_config::domain::AilError;
//!
//! fn cache_port() -> Result<i64, AilError> {
//!     let config = load_config(Some("test-cloud"))?;
//!     config.get_int("Redis_Cache", "port", Some(6379))
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
