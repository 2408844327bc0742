//! Integration tests for configuration resolution and loading
//!
//! Note: Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use ail_config::config::{
    process_env, ConfigAccessor, EnvironmentConfig, LegacyConfig, LoadOptions, StoreSettings,
};
use ail_config::domain::{AilError, EnvironmentLabel};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for name in [
        "DEPLOYMENT_ENV",
        "AIL_ENV",
        "AIL_HOME",
        "REDIS_CACHE_HOST",
        "REDIS_CACHE_PASSWORD",
        "TEST_AIL_CACHE_HOST",
    ] {
        std::env::remove_var(name);
    }
}

const CORE_CFG: &str = r#"
[Directories]
pastes = PASTES
har = CRAWLED_SCREENSHOT
screenshot = CRAWLED_SCREENSHOT/screenshot

[Redis_Cache]
host = localhost
port = 6379
db = 0

[Kvrocks_DB]
host = localhost
port = 6383
db = 0
password =

[Logs]
logLevel = INFO
"#;

const TEST_CLOUD_CFG: &str = r#"
[Environment]
name = test-cloud
type = testing
deployment_target = azure

[Redis_Cache]
host = ${TEST_AIL_CACHE_HOST}
port = 6380
ssl = true

[Redis]
host = cache.internal

[Flask]
baseurl = /ail/
secret_key = change-me
max_preview_char = 250
max_preview_modal = 500
DiffMaxLineLength = 10000
max_dashboard_logs = 15
"#;

fn write_configs(dir: &Path) -> PathBuf {
    let root = dir.join("configs");
    fs::create_dir_all(root.join("environments")).unwrap();
    fs::write(root.join("core.cfg"), CORE_CFG).unwrap();
    fs::write(root.join("environments/test-cloud.cfg"), TEST_CLOUD_CFG).unwrap();
    root
}

fn load(root: &Path, environment: Option<&str>) -> ail_config::domain::Result<EnvironmentConfig> {
    let options = LoadOptions {
        environment: environment.map(str::to_string),
        config_root: Some(root.to_path_buf()),
        search_from: None,
    };
    EnvironmentConfig::load_with(&options, &process_env)
}

#[test]
fn test_environment_file_overrides_base() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let root = write_configs(dir.path());

    let config = load(&root, Some("test-cloud")).unwrap();

    // Overlapping keys come from the environment file
    assert_eq!(config.get_int("Redis_Cache", "port", None).unwrap(), 6380);
    assert!(config.get_bool("Redis_Cache", "ssl", Some(false)).unwrap());
    // Non-overlapping keys survive from the base file
    assert_eq!(config.get_int("Redis_Cache", "db", None).unwrap(), 0);
    assert_eq!(config.require("Kvrocks_DB", "port").unwrap(), "6383");
    assert!(config.validate().is_valid());
}

#[test]
fn test_local_override_wins() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let root = write_configs(dir.path());
    fs::write(
        root.join("test-cloud.local.cfg"),
        "[Redis_Cache]\nport = 7000\n",
    )
    .unwrap();

    let config = load(&root, Some("test-cloud")).unwrap();
    assert_eq!(config.get_int("Redis_Cache", "port", None).unwrap(), 7000);
    assert_eq!(config.loaded_files().len(), 3);
}

#[test]
fn test_int_fallback_only_for_absent_values() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let root = write_configs(dir.path());
    let config = load(&root, Some("test-cloud")).unwrap();

    assert_eq!(
        config.get_int("Redis_Queues", "port", Some(6379)).unwrap(),
        6379
    );
    assert!(matches!(
        config.get_int("Redis_Queues", "port", None),
        Err(AilError::SectionNotFound(_))
    ));
    assert!(matches!(
        config.get_int("Environment", "type", Some(1)),
        Err(AilError::TypeCoercion { .. })
    ));
}

#[test]
fn test_placeholder_substitution_from_process_env() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let root = write_configs(dir.path());

    let unresolved = load(&root, Some("test-cloud")).unwrap();
    assert_eq!(
        unresolved.require("Redis_Cache", "host").unwrap(),
        "${TEST_AIL_CACHE_HOST}"
    );

    std::env::set_var("TEST_AIL_CACHE_HOST", "cache.example.net");
    let resolved = load(&root, Some("test-cloud")).unwrap();
    assert_eq!(
        resolved.require("Redis_Cache", "host").unwrap(),
        "cache.example.net"
    );
    cleanup_env_vars();
}

#[test]
fn test_environment_from_variables() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let root = write_configs(dir.path());

    std::env::set_var("AIL_ENV", "dev-local");
    std::env::set_var("DEPLOYMENT_ENV", "staging");
    let config = load(&root, None).unwrap();
    assert_eq!(config.environment(), EnvironmentLabel::TestCloud);
    assert!(config.is_testing());

    std::env::remove_var("DEPLOYMENT_ENV");
    let result = load(&root, None);
    assert!(matches!(
        result,
        Err(AilError::EnvironmentConfigMissing(_))
    ));
    cleanup_env_vars();
}

#[test]
fn test_typed_settings_and_directories() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let root = write_configs(dir.path());
    let config = load(&root, Some("test-cloud")).unwrap();

    let settings = config.settings();
    let web = settings.web.as_ref().unwrap();
    assert_eq!(web.base_url, "/ail");

    let directories = settings.directories.as_ref().unwrap();
    assert_eq!(directories.items, dir.path().join("PASTES/"));
    assert_eq!(
        config.directory("screenshot").unwrap(),
        dir.path().join("CRAWLED_SCREENSHOT/screenshot")
    );

    let kvrocks = StoreSettings::from_config(&config, "Kvrocks_DB").unwrap();
    assert!(kvrocks.password.is_none());
    assert_eq!(settings.stores.len(), 2);
}

#[test]
fn test_discovery_from_nested_directory() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    write_configs(dir.path());
    let nested = dir.path().join("var/www");
    fs::create_dir_all(&nested).unwrap();

    let options = LoadOptions {
        environment: Some("test-cloud".to_string()),
        config_root: None,
        search_from: Some(nested),
    };
    let config = EnvironmentConfig::load_with(&options, &process_env).unwrap();
    assert_eq!(config.config_root(), dir.path().join("configs"));
}

#[test]
fn test_legacy_selects_azure_file() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("configs");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("core.cfg"), "[Redis_Cache]\nhost = localhost\n").unwrap();
    fs::write(root.join("azure.cfg"), "[Redis_Cache]\nhost = ${REDIS_CACHE_HOST}\n").unwrap();

    std::env::set_var("AIL_HOME", dir.path());
    let config = LegacyConfig::load().unwrap();
    assert_eq!(config.config_file(), root.join("core.cfg"));

    std::env::set_var("REDIS_CACHE_HOST", "cache.redis.cache.windows.net");
    std::env::set_var("REDIS_CACHE_PASSWORD", "key");
    let config = LegacyConfig::load().unwrap();
    assert_eq!(config.config_file(), root.join("azure.cfg"));
    // The legacy loader leaves placeholders untouched
    assert_eq!(
        config.require("Redis_Cache", "host").unwrap(),
        "${REDIS_CACHE_HOST}"
    );
    cleanup_env_vars();
}
