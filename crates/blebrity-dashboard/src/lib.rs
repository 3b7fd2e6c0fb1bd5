//! # Blebrity Dashboard
//!
//! Keeps a dashboard snapshot current: fetches the full event batch from
//! the store, aggregates it and publishes the result, on a fixed cadence.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod refresh;

pub use cache::SnapshotCache;
pub use refresh::{write_snapshot, OutputTarget, RefreshService};

use blebrity_config::Config;
use blebrity_metrics::AggregationConfig;
use blebrity_store::StoreConfig;

/// Store client settings from the application config
pub fn store_config(config: &Config) -> StoreConfig {
    let store = &config.store;
    StoreConfig::new(&store.url, &store.api_key)
        .with_table(&store.table)
        .with_timeout(store.timeout_seconds)
        .with_rate_limit(store.rate_limit_per_sec)
        .with_max_retries(store.max_retries as usize)
        .with_page_size(store.page_size as usize)
}

/// Aggregation limits from the application config
pub fn aggregation_config(config: &Config) -> AggregationConfig {
    AggregationConfig {
        recent_events_limit: config.metrics.recent_events_limit,
        retention_cohort_limit: config.metrics.retention_cohort_limit,
        celebrity_limit: config.metrics.celebrity_limit,
        display_timezone: config.display_timezone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_conversions() {
        let mut config = Config::default();
        config.store.url = "https://abc.supabase.co".to_string();
        config.store.api_key = "anon-key".to_string();
        config.store.page_size = 250;
        config.metrics.celebrity_limit = 3;
        config.metrics.display_timezone = "Europe/Oslo".to_string();

        let store = store_config(&config);
        assert_eq!(store.base_url, "https://abc.supabase.co");
        assert_eq!(store.table, "analytics_events");
        assert_eq!(store.page_size, 250);
        assert_eq!(store.max_retries, 3);

        let aggregation = aggregation_config(&config);
        assert_eq!(aggregation.celebrity_limit, 3);
        assert_eq!(aggregation.recent_events_limit, 50);
        assert_eq!(aggregation.display_timezone, chrono_tz::Europe::Oslo);
    }
}
