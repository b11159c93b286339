//! Shared application state

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::Config;
use crate::event_store::{
    EventStore, EventStoreConfig, EventStoreError, EventStoreResult, StatsCollector, StatsWindow,
};
use crate::types::{DailyStat, Event};
use crate::verse::{QuranApiClient, VerseService, VerseSource};

/// State shared by every request handler
pub struct AppState {
    /// Configuration built once at startup
    pub config: Arc<Config>,

    /// The usage event log
    pub store: Arc<EventStore>,

    /// Verse fetch-or-fallback service
    pub verses: VerseService,
}

impl AppState {
    /// Create state with an explicit verse source
    pub fn new(config: Config, source: Arc<dyn VerseSource>) -> Self {
        let store = EventStore::with_config(EventStoreConfig::new(&config.event_log_path));

        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            verses: VerseService::new(source),
        }
    }

    /// Create state backed by the configured upstream verse API
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = QuranApiClient::new(config.verse_api_url.clone(), config.verse_timeout)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Append an event, waiting for the write to land
    pub async fn record(&self, event: Event) -> EventStoreResult<()> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.append(&event))
            .await
            .map_err(|e| EventStoreError::Io(std::io::Error::other(e)))?
    }

    /// Append an event without waiting; failures are only logged
    pub fn record_in_background(&self, event: Event) {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = store.append(&event) {
                tracing::error!(
                    error = %e,
                    event_type = %event.event_type,
                    "failed to record event"
                );
            }
        });
    }

    /// Build the daily report for `window` ending on `today`
    pub async fn daily_stats(
        &self,
        window: StatsWindow,
        today: NaiveDate,
    ) -> EventStoreResult<Vec<DailyStat>> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || StatsCollector::new(&store).collect(window, today))
            .await
            .map_err(|e| EventStoreError::Io(std::io::Error::other(e)))?
    }
}
