//! Configuration loading utilities

use crate::Config;
use blebrity_common::{BlebrityError, Result as BlebrityResult};
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "BLEBRITY_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),
}

impl From<ConfigError> for BlebrityError {
    fn from(err: ConfigError) -> Self {
        BlebrityError::config_with_source(err.to_string(), err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from the usual places
    ///
    /// Tries `BLEBRITY_CONFIG_PATH`, then `config.yaml` and `config.yml` in
    /// the working directory, then defaults. Environment overrides apply in
    /// every case.
    pub fn load() -> BlebrityResult<Config> {
        let config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            debug!("No configuration file found, using defaults");
            Self::load_defaults()?
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BlebrityResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Defaults plus environment overrides
    pub fn load_defaults() -> Result<Config, ConfigError> {
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;

        if config.store.url.is_empty() {
            return Err(ConfigError::MissingConfig(
                "store.url (or BLEBRITY_STORE_URL)".to_string(),
            ));
        }
        config.validate_all()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        // Store
        if let Ok(url) = env::var("BLEBRITY_STORE_URL") {
            config.store.url = url;
        }

        if let Ok(api_key) = env::var("BLEBRITY_STORE_API_KEY") {
            config.store.api_key = api_key;
        }

        if let Ok(table) = env::var("BLEBRITY_STORE_TABLE") {
            config.store.table = table;
        }

        // Refresh and metrics
        if let Some(interval) = parse_env("BLEBRITY_REFRESH_INTERVAL")? {
            config.refresh.interval_seconds = interval;
        }

        if let Some(limit) = parse_env("BLEBRITY_RECENT_EVENTS_LIMIT")? {
            config.metrics.recent_events_limit = limit;
        }

        if let Ok(timezone) = env::var("BLEBRITY_DISPLAY_TIMEZONE") {
            config.metrics.display_timezone = timezone;
        }

        // Logging
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(file) = env::var("LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}

fn parse_env<T>(var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::EnvParseError {
                var: var.to_string(),
                source: Box::new(e),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// Tests in this module mutate process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const OVERRIDE_VARS: [&str; 8] = [
        "BLEBRITY_STORE_URL",
        "BLEBRITY_STORE_API_KEY",
        "BLEBRITY_STORE_TABLE",
        "BLEBRITY_REFRESH_INTERVAL",
        "BLEBRITY_RECENT_EVENTS_LIMIT",
        "BLEBRITY_DISPLAY_TIMEZONE",
        "LOG_LEVEL",
        "LOG_FILE",
    ];

    fn clear_env() {
        for var in OVERRIDE_VARS {
            env::remove_var(var);
        }
        env::remove_var(CONFIG_PATH_VAR);
    }

    /// Create a temporary YAML config file for testing
    fn create_test_config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    const VALID_YAML: &str = "store:\n  url: \"https://project.supabase.co\"\n  api_key: \"anon-key\"\n  table: \"analytics_events\"\n  timeout_seconds: 20\n  max_retries: 2\n  rate_limit_per_sec: 5\n  page_size: 500\nmetrics:\n  recent_events_limit: 25\n  retention_cohort_limit: 8\n  celebrity_limit: 5\n  display_timezone: \"Europe/Oslo\"\nrefresh:\n  enabled: false\n  interval_seconds: 60\nlogging:\n  level: \"debug\"\n  json: true\n";

    #[test]
    fn test_load_valid_yaml_config() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let temp_file = create_test_config_file(VALID_YAML);
        let config = ConfigLoader::load_config(temp_file.path()).expect("Failed to load config");

        assert_eq!(config.store.url, "https://project.supabase.co");
        assert_eq!(config.store.page_size, 500);
        assert_eq!(config.metrics.recent_events_limit, 25);
        assert_eq!(config.metrics.display_timezone, "Europe/Oslo");
        assert!(!config.refresh.enabled);
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_minimal_config() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let yaml = "store:\n  url: \"https://project.supabase.co\"\n  api_key: \"anon-key\"\n";
        let temp_file = create_test_config_file(yaml);
        let config = ConfigLoader::load_config(temp_file.path()).expect("Failed to load config");

        // Unspecified values fall back to defaults
        assert_eq!(config.store.table, "analytics_events");
        assert_eq!(config.store.page_size, 1000);
        assert_eq!(config.refresh.interval_seconds, 30);
        assert_eq!(config.metrics.display_timezone, "UTC");
    }

    #[test]
    fn test_invalid_yaml() {
        let invalid_yaml = "store:\n  url: \"https://x.co\"\n  api_key: [unclosed array";

        let temp_file = create_test_config_file(invalid_yaml);
        let result = ConfigLoader::load_config(temp_file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let yaml = "store:\n  url: \"not_a_url\"\n  api_key: \"\"\n";
        let temp_file = create_test_config_file(yaml);
        let result = ConfigLoader::load_config(temp_file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_environment_variable_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var("BLEBRITY_STORE_URL", "https://env.supabase.co");
        env::set_var("BLEBRITY_STORE_TABLE", "events_v2");
        env::set_var("BLEBRITY_REFRESH_INTERVAL", "120");
        env::set_var("BLEBRITY_RECENT_EVENTS_LIMIT", " 10 ");
        env::set_var("BLEBRITY_DISPLAY_TIMEZONE", "Asia/Tokyo");
        env::set_var("LOG_LEVEL", "warn");
        env::set_var("LOG_FILE", "/tmp/blebrity.log");

        let temp_file = create_test_config_file(VALID_YAML);
        let config = ConfigLoader::load_config(temp_file.path()).expect("Failed to load config");
        clear_env();

        assert_eq!(config.store.url, "https://env.supabase.co");
        assert_eq!(config.store.api_key, "anon-key");
        assert_eq!(config.store.table, "events_v2");
        assert_eq!(config.refresh.interval_seconds, 120);
        assert_eq!(config.metrics.recent_events_limit, 10);
        assert_eq!(config.metrics.display_timezone, "Asia/Tokyo");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.file.as_deref(), Some("/tmp/blebrity.log"));
    }

    #[test]
    fn test_env_parse_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var("BLEBRITY_REFRESH_INTERVAL", "soon");

        let temp_file = create_test_config_file(VALID_YAML);
        let result = ConfigLoader::load_config(temp_file.path());
        clear_env();

        match result.unwrap_err() {
            ConfigError::EnvParseError { var, .. } => assert_eq!(var, "BLEBRITY_REFRESH_INTERVAL"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_config_file() {
        let result = ConfigLoader::load_config("/nonexistent/path/config.yaml");
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_load_defaults_requires_store_url() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        assert!(matches!(
            ConfigLoader::load_defaults().unwrap_err(),
            ConfigError::MissingConfig(_)
        ));

        env::set_var("BLEBRITY_STORE_URL", "https://env.supabase.co");
        env::set_var("BLEBRITY_STORE_API_KEY", "env-key");
        let config = ConfigLoader::load_defaults();
        clear_env();

        let config = config.expect("Failed to load default config");
        assert_eq!(config.store.api_key, "env-key");
        assert_eq!(config.metrics.recent_events_limit, 50);
    }

    #[test]
    fn test_load_uses_config_path_variable() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let temp_file = create_test_config_file(VALID_YAML);
        env::set_var(CONFIG_PATH_VAR, temp_file.path());
        let config = ConfigLoader::load();
        clear_env();

        assert_eq!(config.expect("Failed to load config").store.page_size, 500);
    }

    #[test]
    fn test_config_error_converts_to_blebrity_error() {
        let err: BlebrityError = ConfigError::MissingConfig("store.url".to_string()).into();
        assert!(matches!(err, BlebrityError::Config { .. }));
        assert!(err.to_string().contains("store.url"));
    }
}
