//! Ayati Server
//!
//! Serves a random Quran verse over HTTP, records anonymized usage events to
//! an append-only log, and exposes a daily statistics report behind basic
//! authentication.
//!
//! # Features
//!
//! - **Upstream with fallback**: verses come from the quran.com API, or from a
//!   built-in set when it is slow or down
//! - **Append-only log**: one JSON record per line, safe under concurrent writers
//! - **Dense daily report**: distinct visitors plus served/play/share counts per UTC day
//! - **Cookie identity**: a long-lived opaque `uid` per browser
//!
//! # Modules
//!
//! - `types`: Core data structures (Event, DailyStat, Verse)
//! - `event_store`: Append-only event log and the daily aggregator
//! - `identity`: Visitor id resolution and cookie issuance
//! - `validation`: Ingest payload validation
//! - `verse`: Upstream client, reference parsing and fallback verses
//! - `api`: Axum router, handlers and admin auth
//! - `config`: Environment-sourced configuration
//! - `server`: Listener lifecycle and graceful shutdown
//! - `utils`: Day bucketing helpers
//!
//! # Example
//!
//! ```no_run
//! use ayati::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     ayati::server::run(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod event_store;
pub mod identity;
pub mod server;
pub mod types;
pub mod utils;
pub mod validation;
pub mod verse;

// Re-export commonly used items at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use event_store::{EventStore, EventStoreConfig, StatsCollector, StatsWindow};
pub use identity::Visitor;
pub use types::{DailyStat, Event, EventMeta, EventType, Verse};
pub use verse::{VerseService, VerseSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
