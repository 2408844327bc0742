//! LACUS URL injection
//!
//! Writes the crawler's LACUS endpoint from the process environment into the
//! `crawler:lacus` hash of database 3, then reads it back to confirm.
//! Every step is fail-closed: a missing variable or malformed URL stops the
//! run before any connection is made.

use crate::adapters::store::{ConnectionFactory, ConnectionSpec, KeyValueStore, StoreConnector};
use crate::config::secret::{secret_string, SecretString};
use crate::domain::{AilError, Result};
use url::Url;

/// Hash holding the crawler's LACUS settings
pub const LACUS_KEY: &str = "crawler:lacus";

/// Field of [`LACUS_KEY`] holding the URL
pub const LACUS_FIELD: &str = "url";

/// Database index of the crawler metadata store
pub const LACUS_DB: i64 = 3;

/// Port used when `REDIS_CACHE_PORT` is unset
pub const DEFAULT_CACHE_PORT: u16 = 6379;

/// Inputs of one injection run, read from the environment
#[derive(Debug, Clone)]
pub struct InjectionSettings {
    pub lacus_url: String,
    pub host: String,
    pub port: u16,
    pub password: SecretString,
    pub ssl: bool,
}

impl InjectionSettings {
    /// Reads the process environment
    ///
    /// # Errors
    ///
    /// See [`InjectionSettings::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|name| std::env::var(name).ok())
    }

    /// Reads `LACUS_URL`, `REDIS_CACHE_HOST`, `REDIS_CACHE_PORT`,
    /// `REDIS_CACHE_PASSWORD` and `REDIS_CACHE_SSL` through `lookup`
    ///
    /// # Errors
    ///
    /// - [`AilError::MissingEnvironmentVariable`] for an unset URL, host or
    ///   password
    /// - [`AilError::InvalidUrlFormat`] if the URL lacks a scheme or host
    /// - [`AilError::Configuration`] for a non-numeric port
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let required = |name: &str| {
            read(name).ok_or_else(|| AilError::MissingEnvironmentVariable(name.to_string()))
        };

        let lacus_url = required("LACUS_URL")?;
        validate_lacus_url(&lacus_url)?;

        let host = required("REDIS_CACHE_HOST")?;
        let password = required("REDIS_CACHE_PASSWORD")?;

        let port = match read("REDIS_CACHE_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AilError::Configuration(format!("REDIS_CACHE_PORT is not a valid port: {raw}"))
            })?,
            None => DEFAULT_CACHE_PORT,
        };

        let ssl = read("REDIS_CACHE_SSL")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        Ok(Self {
            lacus_url,
            host,
            port,
            password: secret_string(password),
            ssl,
        })
    }

    /// Connection to database [`LACUS_DB`] of the cache server
    pub fn connection_spec(&self) -> ConnectionSpec {
        ConnectionSpec {
            host: self.host.clone(),
            port: self.port,
            db: LACUS_DB,
            password: Some(self.password.clone()),
            ssl: self.ssl,
            ssl_verify: false,
        }
    }
}

/// Checks that `raw` parses as a URL with both a scheme and a host
///
/// # Errors
///
/// [`AilError::InvalidUrlFormat`] otherwise.
pub fn validate_lacus_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|_| AilError::InvalidUrlFormat(raw.to_string()))?;
    if url.scheme().is_empty() || url.host_str().map_or(true, str::is_empty) {
        return Err(AilError::InvalidUrlFormat(raw.to_string()));
    }
    Ok(url)
}

/// Writes the URL and verifies the stored value
///
/// # Errors
///
/// [`AilError::ConnectionExhausted`] if the store cannot be reached,
/// [`AilError::InjectionVerificationFailed`] if the re-read value differs.
pub async fn inject_lacus_url<C: StoreConnector>(
    factory: &ConnectionFactory<C>,
    settings: &InjectionSettings,
) -> Result<()> {
    tracing::info!(lacus_url = %settings.lacus_url, "Injecting LACUS URL");

    let store = factory
        .open_spec(LACUS_KEY, &settings.connection_spec())
        .await?;
    tracing::info!(db = LACUS_DB, "Connected to crawler metadata store");

    store
        .hset(LACUS_KEY, LACUS_FIELD, &settings.lacus_url)
        .await?;

    let stored = store.hget(LACUS_KEY, LACUS_FIELD).await?;
    if stored.as_deref() != Some(settings.lacus_url.as_str()) {
        return Err(AilError::InjectionVerificationFailed {
            expected: settings.lacus_url.clone(),
            actual: stored,
        });
    }

    tracing::info!(key = LACUS_KEY, field = LACUS_FIELD, "LACUS URL injection verified");
    Ok(())
}
