//! Configuration loading
//!
//! [`EnvironmentConfig`] is the tiered loader: resolve the environment label,
//! locate the configuration root, merge `core.cfg` + environment file + local
//! override, then substitute `${VAR}` placeholders.
//!
//! [`LegacyConfig`] reads the single file picked by
//! [`legacy_config_file`](crate::config::resolver::legacy_config_file).
//! It performs no placeholder substitution.

use super::document::{ConfigAccessor, ConfigDocument};
use super::resolver::{legacy_config_file, ConfigFileResolver, CONFIGS_DIR, INSTALL_ROOT_VAR};
use super::schema::{
    CrawlerSettings, DirectorySettings, EnvironmentInfo, StoreSettings, SubmitSettings,
    WebSettings,
};
use crate::domain::errors::AilError;
use crate::domain::result::Result;
use crate::domain::{EnvironmentLabel, StoreName};
use std::path::{Path, PathBuf};

/// Sections that must be present for [`EnvironmentConfig::validate`]
pub const REQUIRED_SECTIONS: [&str; 4] = ["Environment", "Redis", "Flask", "Logs"];

/// Process environment lookup used by the loaders
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Options for [`EnvironmentConfig::load_with`]
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit environment; must be a canonical label
    pub environment: Option<String>,

    /// Explicit `configs` directory; skips discovery
    pub config_root: Option<PathBuf>,

    /// Directory discovery starts from; defaults to the working directory
    pub search_from: Option<PathBuf>,
}

impl LoadOptions {
    /// Options for a named environment
    pub fn for_environment(environment: impl Into<String>) -> Self {
        Self {
            environment: Some(environment.into()),
            ..Self::default()
        }
    }

    /// Sets the configuration root
    pub fn with_config_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config_root = Some(root.into());
        self
    }
}

/// Outcome of [`EnvironmentConfig::validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Required sections absent from the merged document
    pub missing_sections: Vec<String>,
}

impl ValidationReport {
    /// Whether every required section is present
    pub fn is_valid(&self) -> bool {
        self.missing_sections.is_empty()
    }
}

/// Environment-aware configuration merged from the tiered files
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    environment: EnvironmentLabel,
    config_root: PathBuf,
    install_root: PathBuf,
    loaded_files: Vec<PathBuf>,
    document: ConfigDocument,
    settings: Settings,
}

/// Loads the tiered configuration for `environment` (or the resolved one)
///
/// # Errors
///
/// See [`EnvironmentConfig::load_with`].
///
/// # Examples
///
/// ```no_run
/// use ail_config::config::{load_config, ConfigAccessor};
///
/// let config = load_config(Some("dev-local")).expect("configuration");
/// let port = config.get_int("Redis_Cache", "port", Some(6379)).expect("port");
/// ```
pub fn load_config(environment: Option<&str>) -> Result<EnvironmentConfig> {
    let options = LoadOptions {
        environment: environment.map(str::to_string),
        ..LoadOptions::default()
    };
    EnvironmentConfig::load_with(&options, &process_env)
}

impl EnvironmentConfig {
    /// Loads with explicit options and environment lookup.
    ///
    /// # Errors
    ///
    /// - [`AilError::UnsupportedEnvironment`] for a non-canonical explicit
    ///   environment
    /// - [`AilError::ConfigRootNotFound`] if no configuration root resolves
    /// - [`AilError::EnvironmentConfigMissing`] if the environment file is
    ///   absent
    /// - [`AilError::Configuration`] if a file is not valid INI
    /// - [`AilError::TypeCoercion`], [`AilError::Validation`] or a missing
    ///   option error if a present section holds a malformed value
    pub fn load_with(
        options: &LoadOptions,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let environment = EnvironmentLabel::resolve_with(options.environment.as_deref(), lookup)?;
        let install_home = lookup(INSTALL_ROOT_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let resolver = match &options.config_root {
            Some(root) => ConfigFileResolver::with_root(root)?,
            None => {
                let start = match &options.search_from {
                    Some(dir) => dir.clone(),
                    None => std::env::current_dir()?,
                };
                ConfigFileResolver::discover(&start, install_home.as_deref())?
            }
        };

        let loaded_files = resolver.layered_files(environment)?;
        let mut document = ConfigDocument::from_files(&loaded_files)?;
        let unresolved = document.substitute_with(lookup);

        let config_root = resolver.config_root().to_path_buf();
        let install_root = install_home.unwrap_or_else(|| {
            config_root
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| config_root.clone())
        });

        let settings = Settings::from_config(&document, &install_root).inspect_err(|e| {
            tracing::error!(environment = %environment, error = %e, "Invalid configuration value");
        })?;

        tracing::info!(
            environment = %environment,
            config_root = %config_root.display(),
            files = loaded_files.len(),
            unresolved_placeholders = unresolved.len(),
            "Loaded configuration for environment"
        );

        Ok(Self {
            environment,
            config_root,
            install_root,
            loaded_files,
            document,
            settings,
        })
    }

    /// Resolved environment label
    pub fn environment(&self) -> EnvironmentLabel {
        self.environment
    }

    /// The `configs` directory
    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    /// Installation root used for relative directories
    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Files merged into the document, in precedence order
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded_files
    }

    /// Merged document
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Section names present after merging
    pub fn sections(&self) -> Vec<&str> {
        self.document.sections()
    }

    /// Whether an option exists within a section
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.document.has_option(section, option)
    }

    /// All option/value pairs of a section; empty when absent
    pub fn section(&self, section: &str) -> Vec<(String, String)> {
        self.document.section(section)
    }

    /// `[Environment]` summary
    pub fn environment_info(&self) -> EnvironmentInfo {
        EnvironmentInfo::from_config(self, self.environment.as_str())
    }

    /// Development environment
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    /// Testing environment
    pub fn is_testing(&self) -> bool {
        self.environment.is_testing()
    }

    /// Production environment
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }

    /// Directory option resolved against the install root
    pub fn directory(&self, option: &str) -> Result<PathBuf> {
        self.files_directory(option, &self.install_root)
    }

    /// Checks that every required section is present, logging each miss
    pub fn validate(&self) -> ValidationReport {
        let missing_sections: Vec<String> = REQUIRED_SECTIONS
            .iter()
            .filter(|section| !self.document.has_section(section))
            .map(|section| section.to_string())
            .collect();

        if missing_sections.is_empty() {
            tracing::info!("Configuration validation passed");
        } else {
            for section in &missing_sections {
                tracing::error!(section = %section, "Missing required section");
            }
        }

        ValidationReport { missing_sections }
    }

    /// Typed settings of every section present in the document, built at
    /// load time
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl ConfigAccessor for EnvironmentConfig {
    fn raw(&self, section: &str, option: &str) -> Result<&str> {
        self.document.lookup(section, option)
    }

    fn has_section(&self, section: &str) -> bool {
        self.document.has_section(section)
    }
}

/// Single-file configuration selected by the legacy strategy
#[derive(Debug, Clone)]
pub struct LegacyConfig {
    config_file: PathBuf,
    install_root: PathBuf,
    document: ConfigDocument,
}

impl LegacyConfig {
    /// Loads `azure.cfg`/`core.cfg` from `$AIL_HOME/configs`
    ///
    /// # Errors
    ///
    /// [`AilError::ConfigRootNotFound`] without `AIL_HOME`,
    /// [`AilError::ConfigFileNotFound`] when no file exists.
    pub fn load() -> Result<Self> {
        Self::load_with(None, &process_env)
    }

    /// Loads a named file under `$AIL_HOME/configs`, or the default selection
    /// when `file_name` is `None`
    pub fn load_with(
        file_name: Option<&str>,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let install_root = lookup(INSTALL_ROOT_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                AilError::ConfigRootNotFound(format!("{INSTALL_ROOT_VAR} is not set"))
            })?;
        let configs_dir = install_root.join(CONFIGS_DIR);

        let config_file = match file_name {
            Some(name) => {
                let path = configs_dir.join(name);
                if !path.is_file() {
                    return Err(AilError::ConfigFileNotFound(path.display().to_string()));
                }
                path
            }
            None => legacy_config_file(&configs_dir, lookup)?,
        };

        let document = ConfigDocument::from_files(std::slice::from_ref(&config_file))?;
        tracing::info!(path = %config_file.display(), "Loaded legacy configuration");

        Ok(Self {
            config_file,
            install_root,
            document,
        })
    }

    /// The file that was read
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Installation root (`AIL_HOME`)
    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Parsed document
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Directory option resolved against the install root
    pub fn directory(&self, option: &str) -> Result<PathBuf> {
        self.files_directory(option, &self.install_root)
    }
}

impl ConfigAccessor for LegacyConfig {
    fn raw(&self, section: &str, option: &str) -> Result<&str> {
        self.document.lookup(section, option)
    }

    fn has_section(&self, section: &str) -> bool {
        self.document.has_section(section)
    }
}

/// Typed view of the sections consumed by the web front end and the store
/// bootstrap; `None` for each section that is absent
#[derive(Debug, Clone)]
pub struct Settings {
    pub directories: Option<DirectorySettings>,
    pub web: Option<WebSettings>,
    pub submit: Option<SubmitSettings>,
    pub crawler: Option<CrawlerSettings>,
    pub stores: Vec<StoreSettings>,
}

impl Settings {
    /// Builds every record whose section is present
    ///
    /// # Errors
    ///
    /// Fails on the first malformed value.
    pub fn from_config(
        config: &(impl ConfigAccessor + ?Sized),
        install_root: &Path,
    ) -> Result<Self> {
        let present = |section: &str| config.has_section(section);

        let stores = StoreName::ALL
            .iter()
            .filter(|name| present(name.section()))
            .map(|name| StoreSettings::from_config(config, name.section()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            directories: present("Directories")
                .then(|| DirectorySettings::from_config(config, install_root))
                .transpose()?,
            web: present("Flask")
                .then(|| WebSettings::from_config(config))
                .transpose()?,
            submit: present("SubmitPaste")
                .then(|| SubmitSettings::from_config(config))
                .transpose()?,
            crawler: present("Crawler")
                .then(|| CrawlerSettings::from_config(config))
                .transpose()?,
            stores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn write_tree(dir: &Path) -> PathBuf {
        let root = dir.join("configs");
        fs::create_dir_all(root.join("environments")).unwrap();
        fs::write(
            root.join("core.cfg"),
            "[Redis]\nhost = base-host\nport = 6379\n\n[Logs]\nlogLevel = INFO\n",
        )
        .unwrap();
        fs::write(
            root.join("environments/dev-local.cfg"),
            "[Environment]\nname = dev-local\ntype = development\n\n[Redis]\nhost = ${TEST_LOADER_HOST}\n\n\
             [Flask]\nbaseurl = /\nmax_preview_char = 250\nmax_preview_modal = 500\n\
             DiffMaxLineLength = 10000\nmax_dashboard_logs = 15\n",
        )
        .unwrap();
        root
    }

    #[test]
    fn test_load_merges_and_substitutes() {
        let dir = TempDir::new().unwrap();
        let root = write_tree(dir.path());

        let options = LoadOptions::for_environment("dev-local").with_config_root(&root);
        let config =
            EnvironmentConfig::load_with(&options, &lookup_from(&[("TEST_LOADER_HOST", "redis")]))
                .unwrap();

        assert_eq!(config.require("Redis", "host").unwrap(), "redis");
        assert_eq!(config.get_int("Redis", "port", None).unwrap(), 6379);
        assert_eq!(config.loaded_files().len(), 2);
        assert_eq!(config.install_root(), dir.path());
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_validate_reports_missing_sections() {
        let dir = TempDir::new().unwrap();
        let root = write_tree(dir.path());
        fs::remove_file(root.join("core.cfg")).unwrap();

        let options = LoadOptions::for_environment("dev-local").with_config_root(&root);
        let config = EnvironmentConfig::load_with(&options, &lookup_from(&[])).unwrap();

        let report = config.validate();
        assert!(!report.is_valid());
        assert_eq!(report.missing_sections, vec!["Logs".to_string()]);
        assert_eq!(
            config.require("Redis", "host").unwrap(),
            "${TEST_LOADER_HOST}"
        );
    }

    #[test]
    fn test_install_root_from_ail_home() {
        let dir = TempDir::new().unwrap();
        let root = write_tree(dir.path());

        let options = LoadOptions::for_environment("dev-local").with_config_root(&root);
        let config =
            EnvironmentConfig::load_with(&options, &lookup_from(&[("AIL_HOME", "/opt/ail")]))
                .unwrap();
        assert_eq!(config.install_root(), Path::new("/opt/ail"));
    }

    #[test]
    fn test_environment_info_from_section() {
        let dir = TempDir::new().unwrap();
        let root = write_tree(dir.path());

        let options = LoadOptions::for_environment("dev-local").with_config_root(&root);
        let config = EnvironmentConfig::load_with(&options, &lookup_from(&[])).unwrap();
        let info = config.environment_info();
        assert_eq!(info.name, "dev-local");
        assert_eq!(info.kind, "development");
        assert_eq!(info.deployment_target, "unknown");
        assert!(config.is_development());
    }

    #[test]
    fn test_settings_built_on_load() {
        let dir = TempDir::new().unwrap();
        let root = write_tree(dir.path());

        let options = LoadOptions::for_environment("dev-local").with_config_root(&root);
        let config = EnvironmentConfig::load_with(&options, &lookup_from(&[])).unwrap();
        let web = config.settings().web.as_ref().unwrap();
        assert_eq!(web.base_url, "");
        assert_eq!(web.max_preview_char, 250);
        assert!(config.settings().stores.is_empty());
    }

    #[test]
    fn test_malformed_store_port_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let root = write_tree(dir.path());
        fs::write(
            root.join("dev-local.local.cfg"),
            "[Redis_Cache]\nhost = localhost\nport = notanint\ndb = 0\n",
        )
        .unwrap();

        let options = LoadOptions::for_environment("dev-local").with_config_root(&root);
        let err = EnvironmentConfig::load_with(&options, &lookup_from(&[])).unwrap_err();
        assert!(matches!(
            err,
            AilError::TypeCoercion { ref section, ref option, .. }
                if section == "Redis_Cache" && option == "port"
        ));
    }

    #[test]
    fn test_malformed_web_limit_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let root = write_tree(dir.path());
        fs::write(
            root.join("dev-local.local.cfg"),
            "[Flask]\nmax_preview_char = many\n",
        )
        .unwrap();

        let options = LoadOptions::for_environment("dev-local").with_config_root(&root);
        let result = EnvironmentConfig::load_with(&options, &lookup_from(&[]));
        assert!(matches!(result, Err(AilError::TypeCoercion { .. })));
    }

    #[test]
    fn test_legacy_requires_ail_home() {
        let result = LegacyConfig::load_with(None, &lookup_from(&[]));
        assert!(matches!(result, Err(AilError::ConfigRootNotFound(_))));
    }

    #[test]
    fn test_legacy_named_file() {
        let dir = TempDir::new().unwrap();
        let configs = dir.path().join("configs");
        fs::create_dir_all(&configs).unwrap();
        fs::write(configs.join("update.cfg"), "[Update]\nauto_update = True\n").unwrap();

        let home = dir.path().to_string_lossy().to_string();
        let lookup = lookup_from(&[("AIL_HOME", home.as_str())]);
        let config = LegacyConfig::load_with(Some("update.cfg"), &lookup).unwrap();
        assert!(config.get_bool("Update", "auto_update", None).unwrap());

        let missing = LegacyConfig::load_with(Some("missing.cfg"), &lookup);
        assert!(matches!(missing, Err(AilError::ConfigFileNotFound(_))));
    }
}
