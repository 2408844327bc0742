//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for `ail-config` using clap.

pub mod commands;

use crate::config::{LoadOptions, LoggingConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// AIL configuration and store bootstrap tool
#[derive(Parser, Debug)]
#[command(name = "ail-config")]
#[command(version, about, long_about = None)]
#[command(author = "AIL Contributors")]
pub struct Cli {
    /// Environment to load (dev-local, test-cloud, prod-cloud); defaults to
    /// DEPLOYMENT_ENV, then AIL_ENV, then dev-local
    #[arg(short, long, global = true)]
    pub environment: Option<String>,

    /// Configuration directory; discovered from the working directory when
    /// omitted
    #[arg(long, global = true)]
    pub config_root: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "AIL_LOG_LEVEL", global = true)]
    pub log_level: String,

    /// Also write JSON logs to rolling files in this directory
    #[arg(long, env = "AIL_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation (daily, hourly, never)
    #[arg(long, default_value = "daily", env = "AIL_LOG_ROTATION", global = true)]
    pub log_rotation: String,

    #[command(flatten)]
    pub actions: ConfigArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Loader options from the global flags
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            environment: self.environment.clone(),
            config_root: self.config_root.clone(),
            search_from: None,
        }
    }

    /// Logging setup from the global flags; console only without `--log-dir`
    pub fn logging_config(&self) -> LoggingConfig {
        match &self.log_dir {
            Some(dir) => LoggingConfig {
                local_enabled: true,
                local_path: dir.to_string_lossy().into_owned(),
                local_rotation: self.log_rotation.clone(),
            },
            None => LoggingConfig::console(),
        }
    }
}

/// Actions on the loaded configuration
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Check that the required sections are present
    #[arg(short, long)]
    pub validate: bool,

    /// Write a .env file for the environment
    #[arg(short = 'x', long)]
    pub export_env: bool,

    /// Target of --export-env (default: <config-root>/.env.<environment>)
    #[arg(long, requires = "export_env")]
    pub output: Option<PathBuf>,

    /// Print the [Environment] summary
    #[arg(short, long)]
    pub info: bool,

    /// Print one value
    #[arg(short, long, num_args = 2, value_names = ["SECTION", "OPTION"])]
    pub get: Option<Vec<String>>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write LACUS_URL into the crawler:lacus hash of database 3
    InjectLacusUrl(commands::inject::InjectArgs),

    /// Connect every configured store and print its availability
    CheckConnections(commands::check::CheckArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["ail-config"]);
        assert!(cli.environment.is_none());
        assert!(cli.command.is_none());
        assert!(!cli.actions.validate);
    }

    #[test]
    fn test_cli_parse_environment_and_root() {
        let cli = Cli::parse_from([
            "ail-config",
            "-e",
            "test-cloud",
            "--config-root",
            "/opt/ail/configs",
            "-v",
        ]);
        let options = cli.load_options();
        assert_eq!(options.environment.as_deref(), Some("test-cloud"));
        assert_eq!(options.config_root, Some(PathBuf::from("/opt/ail/configs")));
        assert!(cli.actions.validate);
    }

    #[test]
    fn test_cli_parse_get_takes_two_values() {
        let cli = Cli::parse_from(["ail-config", "--get", "Redis_Cache", "port"]);
        assert_eq!(
            cli.actions.get,
            Some(vec!["Redis_Cache".to_string(), "port".to_string()])
        );
        assert!(Cli::try_parse_from(["ail-config", "--get", "Redis_Cache"]).is_err());
    }

    #[test]
    fn test_cli_output_requires_export() {
        assert!(Cli::try_parse_from(["ail-config", "--output", "x.env"]).is_err());
        let cli = Cli::parse_from(["ail-config", "-x", "--output", "x.env"]);
        assert_eq!(cli.actions.output, Some(PathBuf::from("x.env")));
    }

    #[test]
    fn test_cli_logging_flags() {
        let cli = Cli::parse_from(["ail-config"]);
        assert!(!cli.logging_config().local_enabled);

        let cli = Cli::parse_from([
            "ail-config",
            "--log-dir",
            "/var/log/ail",
            "--log-rotation",
            "hourly",
            "check-connections",
        ]);
        let logging = cli.logging_config();
        assert!(logging.local_enabled);
        assert_eq!(logging.local_path, "/var/log/ail");
        assert_eq!(logging.local_rotation, "hourly");
        assert!(logging.validate().is_ok());
    }

    #[test]
    fn test_cli_parse_subcommands() {
        let cli = Cli::parse_from(["ail-config", "inject-lacus-url"]);
        assert!(matches!(cli.command, Some(Commands::InjectLacusUrl(_))));

        let cli = Cli::parse_from([
            "ail-config",
            "check-connections",
            "--legacy",
            "--pool-size",
            "4",
        ]);
        match cli.command {
            Some(Commands::CheckConnections(args)) => {
                assert!(args.legacy);
                assert_eq!(args.pool_size, 4);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
