//! Store passwords held in zeroizing memory
//!
//! Passwords read from `.cfg` files or from `REDIS_CACHE_PASSWORD` are kept
//! in a [`SecretString`] until the moment a connection URL is built. The
//! wrapper zeroes its buffer on drop and redacts itself in `Debug` output,
//! so a `{:?}` of a [`StoreSettings`](crate::config::StoreSettings) never
//! prints a password.
//!
//! ```rust
//! use ail_config::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let password = secret_string("cache-password".to_string());
//! assert_eq!(password.expose_secret(), "cache-password");
//! assert!(!format!("{password:?}").contains("cache-password"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret};
use zeroize::Zeroize;

/// Password buffer, zeroed when dropped
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Whether the password is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Secret password string; call `expose_secret()` to read it
pub type SecretString = Secret<SecretValue>;

/// Wraps a password
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wraps an optional password
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("kvrocks-password".to_string());
        assert_eq!(secret.expose_secret(), "kvrocks-password");
        assert!(!secret.expose_secret().is_empty());
    }

    #[test]
    fn test_secret_string_opt_none() {
        assert!(secret_string_opt(None).is_none());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive-data"));
        assert!(debug_output.contains("REDACTED"));
    }
}
