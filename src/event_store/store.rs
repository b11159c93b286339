//! Event Store - append-only usage log
//!
//! The EventStore owns the newline-delimited JSON log. The writer path only
//! ever appends whole records; the reader path streams raw lines and leaves
//! decoding (and tolerance of torn lines) to the caller.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::types::Event;

/// Configuration for the EventStore
#[derive(Debug, Clone)]
pub struct EventStoreConfig {
    /// Path to the event log file
    pub events_path: PathBuf,
    /// Whether to fsync after every append
    pub sync_on_append: bool,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            events_path: PathBuf::from("data/events.log"),
            sync_on_append: true,
        }
    }
}

impl EventStoreConfig {
    /// Create config for a custom log path
    pub fn new<P: AsRef<Path>>(events_path: P) -> Self {
        Self {
            events_path: events_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Get path to the event log
    pub fn events_path(&self) -> &Path {
        &self.events_path
    }
}

/// Result type for EventStore operations
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// Errors that can occur in EventStore operations
#[derive(Debug, thiserror::Error)]
pub enum EventStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The EventStore manages the append-only event log
pub struct EventStore {
    config: EventStoreConfig,
    /// Serializes appends from concurrent handlers
    write_lock: Mutex<()>,
}

impl EventStore {
    /// Create a new EventStore with default config
    pub fn new() -> Self {
        Self::with_config(EventStoreConfig::default())
    }

    /// Create a new EventStore with custom config
    pub fn with_config(config: EventStoreConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EventStoreConfig {
        &self.config
    }

    /// Get the event log path
    pub fn path(&self) -> &Path {
        self.config.events_path()
    }

    /// Append an event to the event log
    ///
    /// The record and its newline go out in a single `write_all` on an
    /// append-mode handle while the write lock is held, so concurrent
    /// appends interleave only at record boundaries.
    pub fn append(&self, event: &Event) -> EventStoreResult<()> {
        let mut line = event.to_json_line()?.into_bytes();
        line.push(b'\n');

        let events_path = self.config.events_path();

        let _guard = self.write_lock.lock();

        if let Some(parent) = events_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(events_path)?;

        file.write_all(&line)?;

        if self.config.sync_on_append {
            file.sync_data()?;
        }

        Ok(())
    }

    /// Stream every raw line of the log to `visit`
    ///
    /// Lines are split on `\n` without UTF-8 validation, so a partially
    /// written trailing record still reaches the visitor. A missing log is
    /// treated as empty. Returns the number of lines visited.
    pub fn scan<F>(&self, mut visit: F) -> EventStoreResult<usize>
    where
        F: FnMut(&[u8]),
    {
        let file = match File::open(self.config.events_path()) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        let mut buf = Vec::with_capacity(256);
        let mut count = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            visit(line);
            count += 1;
        }

        Ok(count)
    }

    /// Load all parsable events from the event log
    ///
    /// Corrupt lines are skipped with a warning.
    pub fn load_events(&self) -> EventStoreResult<Vec<Event>> {
        let mut events = Vec::new();
        let mut line_num = 0usize;

        self.scan(|line| {
            line_num += 1;
            match Event::from_json_line(line) {
                Ok(event) => events.push(event),
                Err(e) => {
                    tracing::warn!(line = line_num, error = %e, "skipping unparsable event");
                }
            }
        })?;

        Ok(events)
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}
