//! External system integrations for AIL.
//!
//! - [`store`] - Redis/Kvrocks connections behind the
//!   [`StoreConnector`](store::StoreConnector) /
//!   [`KeyValueStore`](store::KeyValueStore) traits
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations.
//!
//! ```rust,no_run
//! use ail_config::adapters::store::{
//!     ConnectionFactory, ConnectionSpec, KeyValueStore, RedisConnector,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = ConnectionSpec {
//!     host: "localhost".to_string(),
//!     port: 6383,
//!     db: 0,
//!     password: None,
//!     ssl: false,
//!     ssl_verify: false,
//! };
//!
//! let factory = ConnectionFactory::new(RedisConnector::new());
//! let store = factory.open_spec("Kvrocks_DB", &spec).await?;
//! store.hset("crawler:lacus", "url", "http://lacus:7100").await?;
//! # Ok(())
//! # }
//! ```

pub mod store;
