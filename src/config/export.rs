//! `.env` file export

use super::document::ConfigAccessor;
use super::loader::EnvironmentConfig;
use crate::domain::result::Result;
use std::path::{Path, PathBuf};

/// Configuration values exported as environment variables:
/// `(section, option, variable)`
pub const ENV_EXPORTS: [(&str, &str, &str); 6] = [
    ("Redis", "host", "REDIS_HOST"),
    ("Redis", "port", "REDIS_PORT"),
    ("Redis", "password", "REDIS_PASSWORD"),
    ("Flask", "secret_key", "FLASK_SECRET_KEY"),
    ("Logs", "logLevel", "LOG_LEVEL"),
    ("Notifications", "ail_domain", "AIL_DOMAIN"),
];

impl EnvironmentConfig {
    /// Default export target: `configs/.env.<environment>`
    pub fn default_env_file(&self) -> PathBuf {
        self.config_root()
            .join(format!(".env.{}", self.environment()))
    }

    /// Renders the `.env` content for this environment
    pub fn render_env_file(&self) -> String {
        let env = self.environment();
        let mut lines = vec![
            format!("# Environment configuration for {env}"),
            "# Generated automatically - do not edit manually".to_string(),
            format!("DEPLOYMENT_ENV={env}"),
            format!("AIL_ENV={env}"),
            String::new(),
        ];

        lines.extend(ENV_EXPORTS.iter().filter_map(|(section, option, variable)| {
            self.optional(section, option)
                .filter(|value| !value.is_empty())
                .map(|value| format!("{variable}={value}"))
        }));

        lines.join("\n")
    }

    /// Writes the `.env` file and returns its path
    ///
    /// # Errors
    ///
    /// Returns [`AilError::Io`](crate::domain::AilError::Io) if the file
    /// cannot be written.
    pub fn export_env_file(&self, path: Option<&Path>) -> Result<PathBuf> {
        let target = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_env_file());

        std::fs::write(&target, self.render_env_file())?;
        tracing::info!(path = %target.display(), "Exported environment variables");
        Ok(target)
    }
}
