//! Domain types shared across the crate.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Error types** ([`AilError`])
//! - **Result type alias** ([`Result`])
//! - **Deployment environments** ([`EnvironmentLabel`])
//! - **Logical store names** ([`StoreName`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, AilError>`]:
//!
//! ```rust,no_run
//! use ail_config::config::ConfigAccessor;
//! use ail_config::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = ail_config::config::load_config(None)?;
//!     let host = config.require("Redis_Cache", "host")?;
//!     println!("cache host: {host}");
//!     Ok(())
//! }
//! ```

pub mod environment;
pub mod errors;
pub mod result;
pub mod store;

// Re-export commonly used types for convenience
pub use environment::EnvironmentLabel;
pub use errors::AilError;
pub use result::Result;
pub use store::StoreName;
