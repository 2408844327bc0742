//! Configuration management for AIL.
//!
//! This module resolves, loads, and reads the INI-style `.cfg` files shared by
//! every AIL process.
//!
//! # Overview
//!
//! Two loaders are available:
//!
//! - [`EnvironmentConfig`] - tiered: `configs/core.cfg`, then
//!   `configs/environments/<environment>.cfg`, then
//!   `configs/<environment>.local.cfg`, with `${VAR_NAME}` substitution
//! - [`LegacyConfig`] - a single `azure.cfg`/`core.cfg` under `$AIL_HOME/configs`
//!
//! Both implement [`ConfigAccessor`] for typed reads with fallbacks.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ail_config::config::{load_config, ConfigAccessor};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None)?;
//!
//! let host = config.require("Redis_Cache", "host")?;
//! let port = config.get_int("Redis_Cache", "port", Some(6379))?;
//! let ssl = config.get_bool("Redis_Cache", "ssl", Some(false))?;
//! println!("{host}:{port} ssl={ssl}");
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! Values may reference the process environment:
//!
//! ```ini
//! [Redis_Cache]
//! host = ${REDIS_CACHE_HOST}
//! password = ${REDIS_CACHE_PASSWORD}
//! ```
//!
//! An unset variable leaves the placeholder in place and logs a warning.

pub mod document;
pub mod export;
pub mod loader;
pub mod resolver;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use document::{parse_bool, resolve_directory, ConfigAccessor, ConfigDocument};
pub use export::ENV_EXPORTS;
pub use loader::{
    load_config, process_env, EnvironmentConfig, LegacyConfig, LoadOptions, Settings,
    ValidationReport, REQUIRED_SECTIONS,
};
pub use resolver::{legacy_config_file, ConfigFileResolver};
pub use schema::{
    CrawlerSettings, DirectorySettings, EnvironmentInfo, LoggingConfig, RetryConfig,
    StoreSettings, SubmitSettings, WebSettings,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
