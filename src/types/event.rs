//! Usage event types for the append-only log
//!
//! Every line of the event log is one serialized [`Event`]. Events are
//! immutable records; the current statistics are derived by scanning them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::day_of;

/// Kind of usage event
///
/// The four known kinds feed the daily report. Anything else a client
/// reports is kept verbatim as [`EventType::Other`] and ignored by the
/// aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// A page load by a visitor
    Visit,
    /// A verse was returned by `/api/random-ayah`
    VerseServed,
    /// Audio playback started
    Play,
    /// The share dialog was used
    Share,
    /// Any other client-reported kind
    Other(String),
}

impl EventType {
    /// Wire name of the event kind
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Visit => "visit",
            EventType::VerseServed => "verse_served",
            EventType::Play => "play",
            EventType::Share => "share",
            EventType::Other(name) => name,
        }
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "visit" => EventType::Visit,
            "verse_served" => EventType::VerseServed,
            "play" => EventType::Play,
            "share" => EventType::Share,
            _ => EventType::Other(name),
        }
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        EventType::from(name.to_string())
    }
}

impl From<EventType> for String {
    fn from(event_type: EventType) -> Self {
        match event_type {
            EventType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form event metadata
pub type EventMeta = BTreeMap<String, String>;

/// An immutable record in the event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Instant the server accepted the event
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,

    /// Opaque visitor identifier from the identity cookie
    #[serde(rename = "uid")]
    pub visitor_id: String,

    /// Kind of event
    #[serde(rename = "type")]
    pub event_type: EventType,

    /// Client or server supplied metadata, always present (possibly empty)
    #[serde(default)]
    pub meta: EventMeta,

    /// UTC calendar day of `timestamp`
    pub day: NaiveDate,
}

impl Event {
    /// Create an event stamped with the current time
    pub fn new(event_type: EventType, visitor_id: impl Into<String>, meta: EventMeta) -> Self {
        Self::at(Utc::now(), event_type, visitor_id, meta)
    }

    /// Create an event stamped with a specific instant
    ///
    /// `day` is always derived from `timestamp`, never supplied separately.
    pub fn at(
        timestamp: DateTime<Utc>,
        event_type: EventType,
        visitor_id: impl Into<String>,
        meta: EventMeta,
    ) -> Self {
        Self {
            timestamp,
            visitor_id: visitor_id.into(),
            event_type,
            meta,
            day: day_of(timestamp),
        }
    }

    /// Serialize event to JSON string (for the log)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize event from a raw log line
    pub fn from_json_line(line: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(line)
    }
}
