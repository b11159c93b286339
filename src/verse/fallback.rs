//! Built-in verses served when the upstream source is unavailable

use rand::seq::SliceRandom;

use super::reference::VerseKey;
use crate::types::Verse;

const fn key(surah: u16, ayah: u16) -> VerseKey {
    VerseKey { surah, ayah }
}

/// Fixed fallback set
pub const FALLBACK_VERSES: &[(VerseKey, &str)] = &[
    (key(18, 10), "رَبَّنَا آتِنَا مِن لَّدُنكَ رَحْمَةً وَهَيِّئْ لَنَا مِنْ أَمْرِنَا رَشَدًا"),
    (key(13, 28), "أَلَا بِذِكْرِ اللَّهِ تَطْمَئِنُّ الْقُلُوبُ"),
    (key(94, 5), "فَإِنَّ مَعَ الْعُسْرِ يُسْرًا"),
    (key(65, 3), "وَمَن يَتَوَكَّلْ عَلَى اللَّهِ فَهُوَ حَسْبُهُ"),
    (key(2, 286), "لَا يُكَلِّفُ اللَّهُ نَفْسًا إِلَّا وُسْعَهَا"),
];

/// Every fallback verse, in table order
pub fn fallback_verses() -> Vec<Verse> {
    FALLBACK_VERSES
        .iter()
        .map(|(key, text)| Verse::from_key(*key, *text))
        .collect()
}

/// Pick one fallback verse uniformly at random
pub fn random_fallback() -> Verse {
    let (key, text) = FALLBACK_VERSES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_VERSES[0]);
    Verse::from_key(key, text)
}
