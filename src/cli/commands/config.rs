//! Configuration actions: `--validate`, `--export-env`, `--info`, `--get`
//!
//! With no action flag the loaded environment and configuration root are
//! printed. Several flags may be combined; they run in the order above and
//! the exit code is 1 if any of them failed.

use crate::cli::ConfigArgs;
use crate::config::{ConfigAccessor, EnvironmentConfig, LoadOptions};

impl ConfigArgs {
    /// Whether any action flag was given
    pub fn has_action(&self) -> bool {
        self.validate || self.export_env || self.info || self.get.is_some()
    }

    /// Execute the requested configuration actions
    pub async fn execute(&self, options: &LoadOptions) -> anyhow::Result<i32> {
        let config = match EnvironmentConfig::load_with(options, &crate::config::process_env) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(1);
            }
        };

        if !self.has_action() {
            print_summary(&config);
            return Ok(0);
        }

        let mut exit_code = 0;

        if self.validate && !validate(&config) {
            exit_code = 1;
        }

        if self.export_env {
            match config.export_env_file(self.output.as_deref()) {
                Ok(path) => println!("✅ Environment file written to {}", path.display()),
                Err(e) => {
                    println!("❌ Failed to export environment file");
                    println!("   Error: {e}");
                    exit_code = 1;
                }
            }
        }

        if self.info {
            let info = config.environment_info();
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        if let Some([section, option]) = self.get.as_deref() {
            match config.require(section, option) {
                Ok(value) => println!("{value}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    exit_code = 1;
                }
            }
        }

        Ok(exit_code)
    }
}

fn print_summary(config: &EnvironmentConfig) {
    println!("Environment: {}", config.environment());
    println!("Config root: {}", config.config_root().display());
    println!("Install root: {}", config.install_root().display());
    for file in config.loaded_files() {
        println!("  loaded {}", file.display());
    }
}

fn validate(config: &EnvironmentConfig) -> bool {
    let report = config.validate();
    if report.is_valid() {
        println!("✅ Configuration is valid");
        println!("   Environment: {}", config.environment());
        println!("   Sections: {}", config.sections().join(", "));
    } else {
        println!("❌ Configuration validation failed");
        for section in &report.missing_sections {
            println!("   Missing required section: [{section}]");
        }
    }
    report.is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_root(env_file: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("configs");
        fs::create_dir_all(root.join("environments")).unwrap();
        fs::write(root.join("environments/dev-local.cfg"), env_file).unwrap();
        dir
    }

    fn options(dir: &TempDir) -> LoadOptions {
        LoadOptions::for_environment("dev-local").with_config_root(dir.path().join("configs"))
    }

    #[tokio::test]
    async fn test_validate_exit_codes() {
        let valid = config_root(
            "[Environment]\nname = dev-local\n[Redis]\nhost = localhost\n\
             [Flask]\nbaseurl = /\nmax_preview_char = 250\nmax_preview_modal = 500\n\
             DiffMaxLineLength = 10000\nmax_dashboard_logs = 15\n[Logs]\nlogLevel = INFO\n",
        );
        let args = ConfigArgs {
            validate: true,
            ..ConfigArgs::default()
        };
        assert_eq!(args.execute(&options(&valid)).await.unwrap(), 0);

        let invalid = config_root("[Redis]\nhost = localhost\n");
        assert_eq!(args.execute(&options(&invalid)).await.unwrap(), 1);

        let malformed = config_root("[Redis_Cache]\nhost = localhost\nport = notanint\ndb = 0\n");
        assert_eq!(args.execute(&options(&malformed)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_option_fails() {
        let dir = config_root("[Redis]\nhost = localhost\n");
        let found = ConfigArgs {
            get: Some(vec!["Redis".to_string(), "host".to_string()]),
            ..ConfigArgs::default()
        };
        assert_eq!(found.execute(&options(&dir)).await.unwrap(), 0);

        let missing = ConfigArgs {
            get: Some(vec!["Redis".to_string(), "port".to_string()]),
            ..ConfigArgs::default()
        };
        assert_eq!(missing.execute(&options(&dir)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_environment_fails() {
        let dir = config_root("");
        let options = LoadOptions::for_environment("staging")
            .with_config_root(dir.path().join("configs"));
        assert_eq!(ConfigArgs::default().execute(&options).await.unwrap(), 1);
    }
}
