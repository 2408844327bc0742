//! Configuration file selection
//!
//! Two independent strategies decide which `.cfg` files are read:
//!
//! - **Tiered** ([`ConfigFileResolver`]): `configs/core.cfg` (optional),
//!   then `configs/environments/<environment>.cfg` (required), then
//!   `configs/<environment>.local.cfg` (optional), merged in that order.
//! - **Legacy** ([`legacy_config_file`]): a single file under
//!   `$AIL_HOME/configs`, `azure.cfg` when the cloud cache credentials are
//!   present in the environment, `core.cfg` otherwise.

use crate::domain::errors::AilError;
use crate::domain::result::Result;
use crate::domain::EnvironmentLabel;
use std::path::{Path, PathBuf};

/// Directory holding the configuration files
pub const CONFIGS_DIR: &str = "configs";

/// Subdirectory holding one file per environment
pub const ENVIRONMENTS_DIR: &str = "environments";

/// Optional base file loaded before the environment file
pub const BASE_CONFIG_FILE: &str = "core.cfg";

/// Legacy cloud configuration file
pub const AZURE_CONFIG_FILE: &str = "azure.cfg";

/// Install root environment variable
pub const INSTALL_ROOT_VAR: &str = "AIL_HOME";

/// Locates configuration files for the tiered strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileResolver {
    config_root: PathBuf,
}

impl ConfigFileResolver {
    /// Uses an explicit configuration root
    ///
    /// # Errors
    ///
    /// Returns [`AilError::ConfigRootNotFound`] if `root` is not a directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Result<Self> {
        let config_root = root.into();
        if !config_root.is_dir() {
            return Err(AilError::ConfigRootNotFound(format!(
                "Configuration directory not found. Expected at: {}",
                config_root.display()
            )));
        }
        Ok(Self { config_root })
    }

    /// Walks up from `start` looking for `configs/environments`, falling back
    /// to `<install_root>/configs`.
    ///
    /// # Errors
    ///
    /// Returns [`AilError::ConfigRootNotFound`] if neither resolves.
    pub fn discover(start: &Path, install_root: Option<&Path>) -> Result<Self> {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIGS_DIR);
            if candidate.join(ENVIRONMENTS_DIR).is_dir() {
                tracing::debug!(config_root = %candidate.display(), "Found configuration root");
                return Ok(Self {
                    config_root: candidate,
                });
            }
        }

        match install_root {
            Some(root) => Self::with_root(root.join(CONFIGS_DIR)),
            None => Err(AilError::ConfigRootNotFound(format!(
                "no {CONFIGS_DIR}/{ENVIRONMENTS_DIR} above {} and {INSTALL_ROOT_VAR} is not set",
                start.display()
            ))),
        }
    }

    /// The `configs` directory
    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    /// Path of the optional base file
    pub fn base_file(&self) -> PathBuf {
        self.config_root.join(BASE_CONFIG_FILE)
    }

    /// Path of the required environment file
    pub fn environment_file(&self, environment: EnvironmentLabel) -> PathBuf {
        self.config_root
            .join(ENVIRONMENTS_DIR)
            .join(format!("{environment}.cfg"))
    }

    /// Path of the optional local override file
    pub fn local_override_file(&self, environment: EnvironmentLabel) -> PathBuf {
        self.config_root.join(format!("{environment}.local.cfg"))
    }

    /// Files to merge, in precedence order (later files win)
    ///
    /// # Errors
    ///
    /// Returns [`AilError::EnvironmentConfigMissing`] if the environment file
    /// does not exist.
    pub fn layered_files(&self, environment: EnvironmentLabel) -> Result<Vec<PathBuf>> {
        let mut files = Vec::with_capacity(3);

        let base = self.base_file();
        if base.is_file() {
            files.push(base);
        }

        let env_file = self.environment_file(environment);
        if !env_file.is_file() {
            return Err(AilError::EnvironmentConfigMissing(env_file));
        }
        files.push(env_file);

        let local = self.local_override_file(environment);
        if local.is_file() {
            tracing::info!(path = %local.display(), "Found local override");
            files.push(local);
        }

        Ok(files)
    }
}

/// Selects the single legacy configuration file under `configs_dir`.
///
/// `azure.cfg` is preferred when both `REDIS_CACHE_HOST` and
/// `REDIS_CACHE_PASSWORD` are set; a missing preferred file falls back to
/// `core.cfg`.
///
/// # Errors
///
/// Returns [`AilError::ConfigFileNotFound`] if neither file exists.
pub fn legacy_config_file(
    configs_dir: &Path,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    let is_set = |name: &str| lookup(name).is_some_and(|v| !v.is_empty());

    let preferred = if is_set("REDIS_CACHE_HOST") && is_set("REDIS_CACHE_PASSWORD") {
        let azure = configs_dir.join(AZURE_CONFIG_FILE);
        tracing::info!(path = %azure.display(), "Using Azure configuration file");
        azure
    } else {
        configs_dir.join(BASE_CONFIG_FILE)
    };

    if preferred.is_file() {
        return Ok(preferred);
    }

    let fallback = configs_dir.join(BASE_CONFIG_FILE);
    if fallback.is_file() {
        tracing::warn!(path = %fallback.display(), "Falling back to core.cfg");
        return Ok(fallback);
    }

    Err(AilError::ConfigFileNotFound(format!(
        "{} (did you set {INSTALL_ROOT_VAR}?)",
        preferred.display()
    )))
}
