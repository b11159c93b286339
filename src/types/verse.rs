//! Verse payload returned by `/api/random-ayah`

use serde::{Deserialize, Serialize};

/// A verse ready to be sent to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub surah: u16,
    pub ayah: u16,
    /// Reference key in `surah:ayah` form
    pub verse_key: String,
    pub text: String,
    pub audio_url: String,
}
