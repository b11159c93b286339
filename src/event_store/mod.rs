//! Event Store Module
//!
//! This module provides the usage log and its read-side rollup:
//! - `EventStore`: Append-only, newline-delimited JSON event log
//! - `StatsCollector`: Scans the log into a dense daily report
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌──────────────┐    ┌─────────────┐    ┌──────────────────┐
//! │ random-ayah  │───►│ append()    │───►│ data/events.log  │
//! │ /api/event   │    │ (one write) │    │ one JSON per line│
//! └──────────────┘    └─────────────┘    └──────────────────┘
//!
//! Read Path (every /api/stats request):
//! ┌──────────────┐    ┌─────────────────┐    ┌──────────────────┐
//! │ scan() lines │───►│ DailyAggregator │───►│ Vec<DailyStat>   │
//! │ skip corrupt │    │ window cutoff   │    │ newest day first │
//! └──────────────┘    └─────────────────┘    └──────────────────┘
//! ```

mod stats;
mod store;

pub use stats::{DailyAggregator, StatsCollector, StatsWindow};
pub use store::{EventStore, EventStoreConfig, EventStoreError, EventStoreResult};
