//! Logging and observability
//!
//! Structured logging on `tracing`:
//! - human-readable console output on stderr
//! - optional JSON log files with rotation
//! - level from the command line, overridden by `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use ail_config::logging::init_logging;
//! use ail_config::config::LoggingConfig;
//!
//! let _guard = init_logging("info", &LoggingConfig::default())
//!     .expect("Failed to initialize logging");
//!
//! tracing::info!(store = "Redis_Cache", "Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard, LOG_FILE_PREFIX};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use ail_config::log_error_with_context;
/// use ail_config::domain::AilError;
///
/// let error = AilError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a failed connection attempt that will be retried or given up
///
/// # Example
///
/// ```no_run
/// use ail_config::log_retry_attempt;
///
/// log_retry_attempt!("Redis_Cache", 2, 3, "Connection refused");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($store:expr, $attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            store = $store,
            attempt = $attempt,
            max_retries = $max_attempts,
            reason = %$reason,
            "Store connection attempt failed"
        );
    };
}
