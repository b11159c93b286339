//! Verse Service
//!
//! Serves one verse per request. The upstream source is tried once within
//! its timeout; any failure is absorbed here and replaced by a random verse
//! from the built-in set, so callers always get a well-formed [`Verse`].

pub mod client;
pub mod fallback;
pub mod reference;

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{EventMeta, Verse};

pub use client::{parse_random_verse, QuranApiClient, DEFAULT_VERSE_API_URL};
pub use fallback::{fallback_verses, random_fallback, FALLBACK_VERSES};
pub use reference::{InvalidVerseKey, VerseKey, AUDIO_BASE_URL};

/// Failure talking to the upstream verse source
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error(transparent)]
    BadReference(#[from] InvalidVerseKey),
}

/// Where verses come from
#[async_trait]
pub trait VerseSource: Send + Sync {
    /// Fetch one random verse
    async fn fetch(&self) -> Result<Verse, UpstreamError>;
}

/// Origin of a served verse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseOrigin {
    Upstream,
    Fallback,
}

/// A verse together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedVerse {
    pub verse: Verse,
    pub origin: VerseOrigin,
}

impl ServedVerse {
    /// Metadata for the `verse_served` event
    pub fn event_meta(&self) -> EventMeta {
        let mut meta = EventMeta::new();
        meta.insert("verse_key".to_string(), self.verse.verse_key.clone());
        if self.origin == VerseOrigin::Fallback {
            meta.insert("fallback".to_string(), "1".to_string());
        }
        meta
    }
}

impl Verse {
    /// Build a verse from its parsed reference, deriving the audio URL
    pub fn from_key(key: VerseKey, text: impl Into<String>) -> Self {
        Self {
            surah: key.surah,
            ayah: key.ayah,
            verse_key: key.to_string(),
            text: text.into(),
            audio_url: key.audio_url(),
        }
    }
}

/// Fetch-or-fallback front for a [`VerseSource`]
#[derive(Clone)]
pub struct VerseService {
    source: Arc<dyn VerseSource>,
}

impl VerseService {
    pub fn new(source: Arc<dyn VerseSource>) -> Self {
        Self { source }
    }

    /// Serve one verse; never fails
    pub async fn serve(&self) -> ServedVerse {
        match self.source.fetch().await {
            Ok(verse) => ServedVerse {
                verse,
                origin: VerseOrigin::Upstream,
            },
            Err(e) => {
                tracing::warn!(error = %e, "upstream verse unavailable, serving fallback");
                ServedVerse {
                    verse: random_fallback(),
                    origin: VerseOrigin::Fallback,
                }
            }
        }
    }
}
