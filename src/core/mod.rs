//! Core logic for AIL store bootstrap.
//!
//! # Modules
//!
//! - [`registry`] - Process-wide, lazily populated store connections
//! - [`inject`] - One-shot LACUS URL injection into the crawler store
//!
//! # Startup Workflow
//!
//! 1. **Load Configuration**: resolve the environment and merge its files
//! 2. **Build Factory**: pick a connector and retry policy
//! 3. **Connect**: open every store once, recording which are available
//! 4. **Share**: callers fetch handles from the registry by [`StoreName`]
//!
//! [`StoreName`]: crate::domain::StoreName

pub mod inject;
pub mod registry;
