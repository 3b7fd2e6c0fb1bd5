//! PostgREST client for the analytics events table
//!
//! Reads every row of the events table, newest first, in fixed-size pages.
//! The server may cap a response below the requested page size, so only an
//! empty page ends the scan.
//! Requests share a pooled HTTP client and a rate limiter, and transient
//! failures (timeouts, connection errors, 5xx) are retried with exponential
//! backoff. Client errors (4xx) fail immediately.

use crate::source::EventSource;
use async_trait::async_trait;
use blebrity_common::{BlebrityError, Event, RawEvent, Result};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, Response};
use std::{collections::HashSet, num::NonZeroU32, sync::Arc, time::Duration};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Table read when none is configured
pub const DEFAULT_TABLE: &str = "analytics_events";

/// Configuration for the event store client
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project base URL (e.g., "https://abc.supabase.co")
    pub base_url: String,
    /// API key sent as `apikey` and as a bearer token
    pub api_key: String,
    pub table: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host (default: 10)
    pub max_idle_per_host: usize,
    /// Rate limit: requests per second (default: 10)
    pub rate_limit_per_sec: u32,
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: usize,
    /// Rows per page (default: 1000)
    pub page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: 30,
            max_idle_per_host: 10,
            rate_limit_per_sec: 10,
            max_retries: 3,
            page_size: 1000,
        }
    }
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit_per_sec: u32) -> Self {
        self.rate_limit_per_sec = rate_limit_per_sec;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Read-only client for the events table
#[derive(Debug, Clone)]
pub struct EventStoreClient {
    client: Client,
    config: StoreConfig,
    endpoint: Url,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl EventStoreClient {
    /// Create a new client with the given configuration
    pub fn new(config: StoreConfig) -> Result<Self> {
        if config.page_size == 0 {
            return Err(BlebrityError::validation_field(
                "Page size must be greater than 0",
                "page_size",
            ));
        }

        let endpoint = Self::endpoint_url(&config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| BlebrityError::network_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| {
                    BlebrityError::validation_field(
                        "Rate limit must be greater than 0",
                        "rate_limit_per_sec",
                    )
                })?,
        );
        let rate_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            endpoint,
            rate_limiter,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn endpoint_url(config: &StoreConfig) -> Result<Url> {
        let raw = format!(
            "{}/rest/v1/{}",
            config.base_url.trim_end_matches('/'),
            config.table
        );
        Url::parse(&raw)
            .map_err(|e| BlebrityError::config_with_source(format!("Invalid store URL: {raw}"), e))
    }

    /// URL of one page of events, newest first
    pub fn page_url(&self, offset: usize) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc")
            .append_pair("limit", &self.config.page_size.to_string())
            .append_pair("offset", &offset.to_string());
        url
    }

    /// Send an authenticated GET with retry logic
    #[instrument(skip(self, url), fields(url = %url))]
    async fn send(&self, url: Url) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(10))
            .take(self.config.max_retries);

        let client = &self.client;
        let api_key = self.config.api_key.as_str();
        let url = &url;

        let response = RetryIf::start(
            retry_strategy,
            move || async move {
                match client
                    .get(url.clone())
                    .header("apikey", api_key)
                    .bearer_auth(api_key)
                    .send()
                    .await
                {
                    Ok(response) if response.status().is_success() => {
                        debug!("Request successful: {}", response.status());
                        Ok(response)
                    }
                    Ok(response) => {
                        let status = response.status();
                        if status.is_server_error() {
                            warn!("Server error, will retry: {}", status);
                        } else {
                            error!("Store returned error status: {}", status);
                        }
                        Err(BlebrityError::store_with_status(
                            format!("Store returned {status}"),
                            status.as_u16(),
                        ))
                    }
                    Err(e) if e.is_timeout() => {
                        warn!("Request timeout, will retry: {}", e);
                        Err(BlebrityError::network_with_source("Request timeout", e))
                    }
                    Err(e) if e.is_connect() => {
                        warn!("Connection error, will retry: {}", e);
                        Err(BlebrityError::network_with_source("Connection error", e))
                    }
                    Err(e) => {
                        error!("Request failed: {}", e);
                        Err(BlebrityError::network_with_source("Request failed", e))
                    }
                }
            },
            |e: &BlebrityError| e.is_retryable(),
        )
        .await?;

        Ok(response)
    }

    /// Fetch one page of raw rows
    #[instrument(skip(self))]
    async fn fetch_page(&self, offset: usize) -> Result<Vec<RawEvent>> {
        let response = self.send(self.page_url(offset)).await?;
        let text = response
            .text()
            .await
            .map_err(|e| BlebrityError::network_with_source("Failed to read response body", e))?;

        let rows: Vec<RawEvent> = serde_json::from_str(&text)?;
        debug!("Fetched {} rows at offset {}", rows.len(), offset);
        Ok(rows)
    }

    /// Fetch every event, newest first
    ///
    /// Pages until the store returns an empty page. Rows already seen under
    /// the same id are dropped, since offsets shift when new events land
    /// between pages. Payloads are normalized so that `event_data` is always
    /// a mapping.
    #[instrument(skip(self), fields(table = %self.config.table))]
    pub async fn fetch_events(&self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        let mut seen = HashSet::new();
        let mut offset = 0usize;
        let mut pages = 0usize;

        loop {
            let rows = self.fetch_page(offset).await?;
            if rows.is_empty() {
                break;
            }
            offset += rows.len();
            pages += 1;

            for row in rows {
                let event = row.normalize();
                if seen.insert(event.id.clone()) {
                    events.push(event);
                } else {
                    debug!("Skipping duplicate event {}", event.id);
                }
            }
        }

        info!("Fetched {} events in {} pages", events.len(), pages);
        Ok(events)
    }

    /// Test the connection to the store
    ///
    /// Requests a single row; returns true if the table is readable.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> bool {
        info!("Testing connection to event store");
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("limit", "1");

        match self.send(url).await {
            Ok(_) => {
                info!("Connection test successful");
                true
            }
            Err(e) => {
                warn!("Connection test failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl EventSource for EventStoreClient {
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        EventStoreClient::fetch_events(self).await
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.config.table, self.endpoint.host_str().unwrap_or("unknown host"))
    }
}
