//! Application configuration structures

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Event store connection
    #[validate]
    pub store: StoreSettings,

    /// Aggregation limits and display options
    #[validate]
    pub metrics: MetricsSettings,

    /// Periodic refresh of the dashboard snapshot
    #[validate]
    pub refresh: RefreshSettings,

    /// Logging configuration
    #[validate]
    pub logging: LoggingSettings,
}

/// Event store (PostgREST) configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StoreSettings {
    /// Project base URL, e.g. `https://abc.supabase.co`
    #[validate(url(message = "Store URL must be a valid URL"))]
    pub url: String,

    /// Anonymous or service API key
    #[validate(length(min = 1, message = "Store API key cannot be empty"))]
    pub api_key: String,

    /// Table holding the analytics events
    #[validate(regex(
        path = "crate::validation::TABLE_NAME_REGEX",
        message = "Table name may only contain letters, digits and underscores"
    ))]
    pub table: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Maximum number of retries for failed requests
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: u32,

    #[validate(range(min = 1, max = 100, message = "Rate limit must be between 1 and 100 requests per second"))]
    pub rate_limit_per_sec: u32,

    /// Rows requested per page
    #[validate(range(min = 1, max = 10000, message = "Page size must be between 1 and 10000"))]
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MetricsSettings {
    #[validate(range(min = 1, max = 1000, message = "Recent events limit must be between 1 and 1000"))]
    pub recent_events_limit: usize,

    #[validate(range(min = 1, max = 365, message = "Retention cohort limit must be between 1 and 365"))]
    pub retention_cohort_limit: usize,

    #[validate(range(min = 1, max = 100, message = "Celebrity limit must be between 1 and 100"))]
    pub celebrity_limit: usize,

    /// IANA timezone used to render event times, e.g. `Europe/Oslo`
    #[validate(custom(
        function = "crate::validation::validate_timezone",
        message = "Display timezone must be a valid IANA timezone name"
    ))]
    pub display_timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RefreshSettings {
    /// Whether to keep refreshing after the first snapshot
    pub enabled: bool,

    #[validate(range(min = 5, max = 3600, message = "Refresh interval must be between 5 and 3600 seconds"))]
    pub interval_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error"
    ))]
    pub level: String,

    /// Optional log file path
    #[validate(custom(function = "crate::validation::validate_file_path"))]
    pub file: Option<String>,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,

    /// Include span context in log lines
    pub include_spans: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: "analytics_events".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            rate_limit_per_sec: 10,
            page_size: 1000,
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            recent_events_limit: 50,
            retention_cohort_limit: 10,
            celebrity_limit: 10,
            display_timezone: "UTC".to_string(),
        }
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 30,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json: false,
            include_spans: false,
        }
    }
}

impl Config {
    /// Run every field validator
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }

    /// Parsed display timezone, UTC when the name is not recognised
    pub fn display_timezone(&self) -> chrono_tz::Tz {
        self.metrics
            .display_timezone
            .parse()
            .unwrap_or(chrono_tz::Tz::UTC)
    }
}

impl LoggingSettings {
    /// Subscriber settings for [`blebrity_common::init_logging`]
    pub fn to_logging_config(&self) -> blebrity_common::LoggingConfig {
        blebrity_common::LoggingConfig {
            level: self.level.clone(),
            json_format: self.json,
            file_path: self.file.clone(),
            include_spans: self.include_spans,
            ..Default::default()
        }
    }
}
