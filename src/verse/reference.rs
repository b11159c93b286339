//! Verse reference keys and audio URLs

use std::fmt;
use std::str::FromStr;

/// Recitation audio host; files are named `SSSAAA.mp3`
pub const AUDIO_BASE_URL: &str = "https://everyayah.com/data/Alafasy_128kbps";

/// A parsed `surah:ayah` reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerseKey {
    pub surah: u16,
    pub ayah: u16,
}

/// Error for a reference key that is not `surah:ayah`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid verse key '{0}'")]
pub struct InvalidVerseKey(pub String);

impl VerseKey {
    /// Deterministic recitation URL, e.g. `.../002286.mp3` for `2:286`
    pub fn audio_url(&self) -> String {
        format!("{}/{:03}{:03}.mp3", AUDIO_BASE_URL, self.surah, self.ayah)
    }
}

impl FromStr for VerseKey {
    type Err = InvalidVerseKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidVerseKey(s.to_string());

        let (surah, ayah) = s.split_once(':').ok_or_else(invalid)?;
        let surah: u16 = surah.parse().map_err(|_| invalid())?;
        let ayah: u16 = ayah.parse().map_err(|_| invalid())?;

        if surah == 0 || ayah == 0 {
            return Err(invalid());
        }

        Ok(Self { surah, ayah })
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}
