//! Domain error types
//!
//! This module defines the error hierarchy for configuration resolution,
//! typed access, store connections and the LACUS URL injection.
//! Errors are domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type
///
/// This is the primary error type used throughout the crate. Configuration
/// lookups, store connections and the injector all report through it.
#[derive(Debug, Error)]
pub enum AilError {
    /// No `configs` directory could be located
    #[error("Configuration root not found: {0}")]
    ConfigRootNotFound(String),

    /// The environment-specific configuration file is absent
    #[error("Environment configuration not found: {}", .0.display())]
    EnvironmentConfigMissing(PathBuf),

    /// Neither the preferred nor the fallback legacy configuration file exists
    #[error("Unable to find the configuration file: {0}")]
    ConfigFileNotFound(String),

    /// Explicitly requested environment is not one of the supported labels
    #[error("Unsupported environment: {name}. Supported: {supported}")]
    UnsupportedEnvironment { name: String, supported: String },

    /// Section lookup failed
    #[error("No section: '{0}'")]
    SectionNotFound(String),

    /// Option lookup failed within an existing section
    #[error("No option '{option}' in section: '{section}'")]
    OptionNotFound { section: String, option: String },

    /// Stored string could not be parsed as the requested type
    #[error("Cannot read [{section}] {option} = '{value}' as {expected}")]
    TypeCoercion {
        section: String,
        option: String,
        value: String,
        expected: &'static str,
    },

    /// Configuration parsing errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Every connection attempt for a store failed
    #[error("Failed to connect to {name} after {attempts} attempts: {last_error}")]
    ConnectionExhausted {
        name: String,
        attempts: usize,
        last_error: String,
    },

    /// A single connection attempt failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// A store command failed on an open connection
    #[error("Store error: {0}")]
    Store(String),

    /// URL lacks a scheme or a host
    #[error("Invalid URL format: {0}")]
    InvalidUrlFormat(String),

    /// A required process environment variable is unset or empty
    #[error("Environment variable not set: {0}")]
    MissingEnvironmentVariable(String),

    /// Read-back after the injection did not match the written value
    #[error("Injection verification failed. Expected: {expected}, Got: {}", .actual.as_deref().unwrap_or("<nil>"))]
    InjectionVerificationFailed {
        expected: String,
        actual: Option<String>,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl AilError {
    /// Whether the error is a plain absence (section or option), as opposed
    /// to a malformed or unreadable value
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            AilError::SectionNotFound(_) | AilError::OptionNotFound { .. }
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for AilError {
    fn from(err: std::io::Error) -> Self {
        AilError::Io(err.to_string())
    }
}

// Conversion from INI parser errors
impl From<ini::ParseError> for AilError {
    fn from(err: ini::ParseError) -> Self {
        AilError::Configuration(format!("INI parse error: {err}"))
    }
}

impl From<ini::Error> for AilError {
    fn from(err: ini::Error) -> Self {
        match err {
            ini::Error::Io(e) => AilError::from(e),
            ini::Error::Parse(e) => AilError::from(e),
        }
    }
}

// Conversion from redis client errors
impl From<redis::RedisError> for AilError {
    fn from(err: redis::RedisError) -> Self {
        AilError::Store(err.to_string())
    }
}
