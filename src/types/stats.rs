//! Daily statistics row

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of the usage report
///
/// Derived from the event log on every query; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub day: NaiveDate,
    /// Distinct visitor ids with a `visit` event on this day
    pub visitors: usize,
    pub served: u64,
    pub plays: u64,
    pub shares: u64,
}

impl DailyStat {
    /// An all-zero row for a day with no events
    pub fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            visitors: 0,
            served: 0,
            plays: 0,
            shares: 0,
        }
    }
}
