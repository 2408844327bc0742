//! Redis/Kvrocks store access
//!
//! - [`traits`] - [`StoreConnector`] and [`KeyValueStore`] seams
//! - [`spec`] - [`ConnectionSpec`] and URL construction
//! - [`redis`] - pooled implementation on `deadpool-redis`
//! - [`factory`] - [`ConnectionFactory`] with retry and exponential backoff

pub mod factory;
pub mod redis;
pub mod spec;
pub mod traits;

pub use factory::ConnectionFactory;
pub use self::redis::{RedisConnector, RedisStore, DEFAULT_POOL_SIZE};
pub use spec::ConnectionSpec;
pub use traits::{KeyValueStore, StoreConnector};
