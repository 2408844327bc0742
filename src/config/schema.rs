//! Typed settings records
//!
//! Each record is read from one INI section through [`ConfigAccessor`] and
//! validated when it is built, so malformed values are rejected at load time
//! instead of at first use.

use crate::config::document::{resolve_directory, ConfigAccessor};
use crate::config::secret::{secret_string_opt, SecretString};
use crate::domain::errors::AilError;
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Connection settings of one Redis/Kvrocks store section
///
/// Keys: `host`, `port`, `db`, optional `password`, optional `ssl`, optional
/// `ssl_verify`.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Section the settings were read from
    pub section: String,

    /// Server host name
    pub host: String,

    /// Server port
    pub port: u16,

    /// Database index
    pub db: i64,

    /// Password; an empty value in the file means no authentication
    pub password: Option<SecretString>,

    /// TLS enabled, only when explicitly configured
    pub ssl: bool,

    /// Certificate and hostname verification when TLS is enabled
    ///
    /// **SECURITY WARNING**: defaults to `false`, matching the deployed
    /// cloud caches which are reached without certificate verification.
    pub ssl_verify: bool,
}

impl StoreSettings {
    /// Reads and validates a store section
    ///
    /// # Errors
    ///
    /// Returns the accessor error for missing `host`/`port`/`db` or
    /// unparsable values, and a validation error for out-of-range ones.
    pub fn from_config(config: &(impl ConfigAccessor + ?Sized), section: &str) -> Result<Self> {
        let host = config.require(section, "host")?.trim().to_string();
        if host.is_empty() {
            return Err(AilError::Validation(format!("[{section}] host cannot be empty")));
        }

        let port = config.get_int(section, "port", None)?;
        let port = u16::try_from(port).map_err(|_| {
            AilError::Validation(format!("[{section}] port must be between 0 and 65535, got {port}"))
        })?;

        let db = config.get_int(section, "db", None)?;
        if db < 0 {
            return Err(AilError::Validation(format!(
                "[{section}] db must be >= 0, got {db}"
            )));
        }

        let password = config
            .optional(section, "password")
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self {
            section: section.to_string(),
            host,
            port,
            db,
            password: secret_string_opt(password),
            ssl: config.get_bool(section, "ssl", Some(false))?,
            ssl_verify: config.get_bool(section, "ssl_verify", Some(false))?,
        })
    }
}

/// Filesystem locations from `[Directories]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorySettings {
    /// Items (pastes) folder, always with a trailing separator
    pub items: PathBuf,

    /// HAR archives of crawled pages
    pub hars: PathBuf,

    /// Screenshots of crawled pages
    pub screenshots: PathBuf,
}

impl DirectorySettings {
    /// Reads `[Directories]` `pastes`, `har` and `screenshot`
    pub fn from_config(
        config: &(impl ConfigAccessor + ?Sized),
        install_root: &Path,
    ) -> Result<Self> {
        let pastes = config.require("Directories", "pastes")?;
        let mut items = resolve_directory(pastes, install_root)
            .to_string_lossy()
            .into_owned();
        if !items.ends_with('/') {
            items.push('/');
        }

        Ok(Self {
            items: PathBuf::from(items),
            hars: config.files_directory("har", install_root)?,
            screenshots: config.files_directory("screenshot", install_root)?,
        })
    }
}

/// Web front-end settings from `[Flask]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebSettings {
    /// URL prefix: empty, or a single leading `/` followed by the segment
    pub base_url: String,

    /// Characters shown in a tooltip preview
    pub max_preview_char: u64,

    /// Characters shown in a modal preview
    pub max_preview_modal: u64,

    /// Line length above which diffs show an estimate
    pub diff_max_line_length: u64,

    /// Log lines shown on the dashboard
    pub max_dashboard_logs: u64,
}

impl WebSettings {
    /// Reads and validates `[Flask]`
    pub fn from_config(config: &(impl ConfigAccessor + ?Sized)) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(config.require("Flask", "baseurl")?),
            max_preview_char: non_negative(config, "Flask", "max_preview_char")?,
            max_preview_modal: non_negative(config, "Flask", "max_preview_modal")?,
            diff_max_line_length: non_negative(config, "Flask", "DiffMaxLineLength")?,
            max_dashboard_logs: non_negative(config, "Flask", "max_dashboard_logs")?,
        })
    }
}

/// Normalizes a configured base URL: every `/` is dropped and a non-empty
/// remainder gets a single leading `/`
pub fn normalize_base_url(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| *c != '/').collect();
    if stripped.is_empty() {
        stripped
    } else {
        format!("/{stripped}")
    }
}

/// Submission limits from `[SubmitPaste]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitSettings {
    /// Maximum size of a pasted text
    pub text_max_size: u64,

    /// Maximum size of an uploaded file
    pub file_max_size: u64,

    /// Accepted upload extensions
    pub file_allowed_extensions: Vec<String>,
}

impl SubmitSettings {
    /// Reads and validates `[SubmitPaste]`
    pub fn from_config(config: &(impl ConfigAccessor + ?Sized)) -> Result<Self> {
        let extensions = config.require("SubmitPaste", "FILE_ALLOWED_EXTENSIONS")?;
        Ok(Self {
            text_max_size: non_negative(config, "SubmitPaste", "TEXT_MAX_SIZE")?,
            file_max_size: non_negative(config, "SubmitPaste", "FILE_MAX_SIZE")?,
            file_allowed_extensions: extensions
                .split(',')
                .map(|ext| ext.trim().to_string())
                .collect(),
        })
    }
}

/// Crawler switch from `[Crawler]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrawlerSettings {
    /// Whether the crawler is activated
    pub activate_crawler: bool,
}

impl CrawlerSettings {
    /// Reads `[Crawler] activate_crawler`
    pub fn from_config(config: &(impl ConfigAccessor + ?Sized)) -> Result<Self> {
        Ok(Self {
            activate_crawler: config.get_bool("Crawler", "activate_crawler", None)?,
        })
    }
}

/// Summary of the `[Environment]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub deployment_target: String,
    pub log_level: String,
    pub debug_mode: String,
}

impl EnvironmentInfo {
    /// Reads `[Environment]`, defaulting each absent option
    pub fn from_config(config: &(impl ConfigAccessor + ?Sized), environment_name: &str) -> Self {
        let read = |option: &str, default: &str| {
            config
                .optional("Environment", option)
                .unwrap_or(default)
                .to_string()
        };

        Self {
            name: read("name", environment_name),
            kind: read("type", "unknown"),
            deployment_target: read("deployment_target", "unknown"),
            log_level: read("log_level", "INFO"),
            debug_mode: read("debug_mode", "False"),
        }
    }
}

/// Retry configuration for store connections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of connection attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Delay before the second attempt in milliseconds; doubles per attempt
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

impl RetryConfig {
    /// Delay to wait after the failed attempt `attempt` (0-based):
    /// `initial_delay * 2^attempt`
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 1u64.checked_shl(attempt as u32).unwrap_or(u64::MAX);
        Duration::from_millis(self.initial_delay_ms.saturating_mul(factor))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    /// Console-only logging
    pub fn console() -> Self {
        Self {
            local_enabled: false,
            local_path: String::new(),
            local_rotation: default_local_rotation(),
        }
    }

    /// Validates the rotation strategy
    pub fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn non_negative(
    config: &(impl ConfigAccessor + ?Sized),
    section: &str,
    option: &str,
) -> Result<u64> {
    let value = config.get_int(section, option, None)?;
    u64::try_from(value).map_err(|_| {
        AilError::Validation(format!("[{section}] {option} must be >= 0, got {value}"))
    })
}

// Default value functions
fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
