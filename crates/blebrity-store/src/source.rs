//! Where a refresh cycle gets its events from

use async_trait::async_trait;
use blebrity_common::{Event, Result};

/// Anything that can produce a complete batch of events, newest first
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self) -> Result<Vec<Event>>;

    /// Short label for log lines
    fn describe(&self) -> String;
}

/// Fixed in-memory batch, handy for tests and offline runs
#[derive(Debug, Clone, Default)]
pub struct StaticEventSource {
    events: Vec<Event>,
}

impl StaticEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        Ok(self.events.clone())
    }

    fn describe(&self) -> String {
        format!("static batch of {} events", self.events.len())
    }
}
