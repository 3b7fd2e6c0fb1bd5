//! # Blebrity Config
//!
//! Typed configuration for the Blebrity dashboard: a YAML file with
//! environment variable overrides, validated before use.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader, CONFIG_PATH_VAR};
pub use settings::{Config, LoggingSettings, MetricsSettings, RefreshSettings, StoreSettings};
