//! Connection parameters for one store

use crate::config::schema::StoreSettings;
use crate::config::secret::SecretString;
use crate::domain::{AilError, Result};
use secrecy::ExposeSecret;
use std::fmt;
use url::Url;

/// Everything needed to open a connection to one Redis/Kvrocks database
#[derive(Debug, Clone)]
pub struct ConnectionSpec {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub password: Option<SecretString>,
    pub ssl: bool,
    pub ssl_verify: bool,
}

impl ConnectionSpec {
    /// Connection URL: `redis://` or `rediss://` with the password as
    /// credentials, and `#insecure` when TLS runs without verification
    ///
    /// # Errors
    ///
    /// Returns [`AilError::Configuration`] if the host cannot form a URL.
    pub fn to_url(&self) -> Result<Url> {
        let scheme = if self.ssl { "rediss" } else { "redis" };
        let mut url = Url::parse(&format!(
            "{scheme}://{}:{}/{}",
            self.host, self.port, self.db
        ))
        .map_err(|e| {
            AilError::Configuration(format!("Invalid store host '{}': {e}", self.host))
        })?;

        if let Some(password) = &self.password {
            url.set_password(Some(password.expose_secret().as_ref()))
                .map_err(|_| {
                    AilError::Configuration(format!(
                        "Cannot set credentials for host '{}'",
                        self.host
                    ))
                })?;
        }

        if self.ssl && !self.ssl_verify {
            url.set_fragment(Some("insecure"));
        }

        Ok(url)
    }
}

impl From<&StoreSettings> for ConnectionSpec {
    fn from(settings: &StoreSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            db: settings.db,
            password: settings.password.clone(),
            ssl: settings.ssl,
            ssl_verify: settings.ssl_verify,
        }
    }
}

/// `host:port/db`, safe for logs
impl fmt::Display for ConnectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.db)
    }
}
