//! Daily usage statistics
//!
//! Rolls the event log up into one [`DailyStat`] per UTC day over a trailing
//! window. Nothing is cached: every report is a fresh scan of the log, so the
//! same log always produces the same report.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::types::{DailyStat, Event, EventType};
use crate::utils::days_before;

use super::store::{EventStore, EventStoreResult};

/// Trailing window of days covered by a report, always in `1..=31`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow(u32);

impl StatsWindow {
    pub const DEFAULT_DAYS: u32 = 7;
    pub const MAX_DAYS: u32 = 31;

    /// Window for an in-range day count, `None` otherwise
    pub fn new(days: i64) -> Option<Self> {
        if (1..=i64::from(Self::MAX_DAYS)).contains(&days) {
            Some(Self(days as u32))
        } else {
            None
        }
    }

    /// Window from a raw `days` query value
    ///
    /// Missing, unparsable, non-positive and too-large values all select the
    /// default window instead of failing the request.
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|v| v.trim().parse::<i64>().ok())
            .and_then(Self::new)
            .unwrap_or_default()
    }

    /// Number of days in the window
    pub fn days(&self) -> u32 {
        self.0
    }

    /// Oldest day included in a window ending on `today`
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        days_before(today, self.0 - 1)
    }
}

impl Default for StatsWindow {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

#[derive(Debug, Default)]
struct DayBucket {
    visitors: HashSet<String>,
    served: u64,
    plays: u64,
    shares: u64,
}

/// Accumulates log lines into per-day buckets
#[derive(Debug)]
pub struct DailyAggregator {
    window: StatsWindow,
    today: NaiveDate,
    cutoff: NaiveDate,
    buckets: HashMap<NaiveDate, DayBucket>,
    skipped: usize,
}

impl DailyAggregator {
    /// Create an aggregator for the window ending on `today`
    pub fn new(window: StatsWindow, today: NaiveDate) -> Self {
        Self {
            window,
            today,
            cutoff: window.cutoff(today),
            buckets: HashMap::new(),
            skipped: 0,
        }
    }

    /// Feed one raw log line
    ///
    /// Lines that fail to parse are counted and otherwise ignored.
    pub fn ingest_line(&mut self, line: &[u8]) {
        match Event::from_json_line(line) {
            Ok(event) => self.ingest(&event),
            Err(_) => self.skipped += 1,
        }
    }

    /// Feed one decoded event
    pub fn ingest(&mut self, event: &Event) {
        if event.day < self.cutoff || event.day > self.today {
            return;
        }

        match &event.event_type {
            EventType::Visit => {
                self.bucket(event.day)
                    .visitors
                    .insert(event.visitor_id.clone());
            }
            EventType::VerseServed => self.bucket(event.day).served += 1,
            EventType::Play => self.bucket(event.day).plays += 1,
            EventType::Share => self.bucket(event.day).shares += 1,
            EventType::Other(_) => {}
        }
    }

    fn bucket(&mut self, day: NaiveDate) -> &mut DayBucket {
        self.buckets.entry(day).or_default()
    }

    /// Number of lines that failed to parse so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Dense report: one row per day of the window, most recent first
    pub fn finish(self) -> Vec<DailyStat> {
        (0..self.window.days())
            .map(|offset| {
                let day = days_before(self.today, offset);
                match self.buckets.get(&day) {
                    Some(bucket) => DailyStat {
                        day,
                        visitors: bucket.visitors.len(),
                        served: bucket.served,
                        plays: bucket.plays,
                        shares: bucket.shares,
                    },
                    None => DailyStat::empty(day),
                }
            })
            .collect()
    }
}

/// Produces daily reports from an [`EventStore`]
pub struct StatsCollector<'a> {
    store: &'a EventStore,
}

impl<'a> StatsCollector<'a> {
    /// Create a collector reading from `store`
    pub fn new(store: &'a EventStore) -> Self {
        Self { store }
    }

    /// Scan the whole log and build the report for `window` ending on `today`
    pub fn collect(&self, window: StatsWindow, today: NaiveDate) -> EventStoreResult<Vec<DailyStat>> {
        let mut aggregator = DailyAggregator::new(window, today);
        let lines = self.store.scan(|line| aggregator.ingest_line(line))?;

        if aggregator.skipped() > 0 {
            tracing::debug!(
                lines,
                skipped = aggregator.skipped(),
                "skipped unparsable lines while aggregating"
            );
        }

        Ok(aggregator.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventMeta;
    use chrono::{TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event_on(day: NaiveDate, event_type: EventType, visitor: &str) -> Event {
        let ts = Utc
            .from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap());
        Event::at(ts, event_type, visitor, EventMeta::new())
    }

    #[test]
    fn test_window_from_query() {
        assert_eq!(StatsWindow::from_query(None).days(), 7);
        assert_eq!(StatsWindow::from_query(Some("1")).days(), 1);
        assert_eq!(StatsWindow::from_query(Some("31")).days(), 31);
        assert_eq!(StatsWindow::from_query(Some("0")).days(), 7);
        assert_eq!(StatsWindow::from_query(Some("-3")).days(), 7);
        assert_eq!(StatsWindow::from_query(Some("32")).days(), 7);
        assert_eq!(StatsWindow::from_query(Some("abc")).days(), 7);
        assert_eq!(StatsWindow::from_query(Some("")).days(), 7);
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let today = day(2024, 3, 10);
        assert_eq!(StatsWindow::new(1).unwrap().cutoff(today), today);
        assert_eq!(StatsWindow::new(7).unwrap().cutoff(today), day(2024, 3, 4));
    }

    #[test]
    fn test_empty_report_is_dense() {
        let today = day(2024, 3, 1);
        let report = DailyAggregator::new(StatsWindow::new(5).unwrap(), today).finish();

        assert_eq!(report.len(), 5);
        assert_eq!(report[0].day, today);
        assert_eq!(report[1].day, day(2024, 2, 29));
        assert_eq!(report[4].day, day(2024, 2, 26));
        assert!(report.iter().all(|r| *r == DailyStat::empty(r.day)));
    }

    #[test]
    fn test_visitors_are_distinct() {
        let today = day(2024, 3, 10);
        let mut agg = DailyAggregator::new(StatsWindow::default(), today);

        for _ in 0..3 {
            agg.ingest(&event_on(today, EventType::Visit, "A"));
        }
        agg.ingest(&event_on(today, EventType::Visit, "B"));

        let report = agg.finish();
        assert_eq!(report[0].visitors, 2);
    }

    #[test]
    fn test_counters_per_type() {
        let today = day(2024, 3, 10);
        let yesterday = day(2024, 3, 9);
        let mut agg = DailyAggregator::new(StatsWindow::new(2).unwrap(), today);

        agg.ingest(&event_on(today, EventType::VerseServed, "A"));
        agg.ingest(&event_on(today, EventType::VerseServed, "B"));
        agg.ingest(&event_on(today, EventType::Play, "A"));
        agg.ingest(&event_on(yesterday, EventType::Share, "A"));
        agg.ingest(&event_on(yesterday, EventType::Other("install".into()), "A"));

        let report = agg.finish();
        assert_eq!(report[0].served, 2);
        assert_eq!(report[0].plays, 1);
        assert_eq!(report[0].shares, 0);
        assert_eq!(report[1].day, yesterday);
        assert_eq!(report[1].shares, 1);
        assert_eq!(report[1].visitors, 0);
    }

    #[test]
    fn test_events_outside_window_are_ignored() {
        let today = day(2024, 3, 10);
        let mut agg = DailyAggregator::new(StatsWindow::new(3).unwrap(), today);

        agg.ingest(&event_on(day(2024, 3, 7), EventType::Play, "A"));
        agg.ingest(&event_on(day(2024, 3, 8), EventType::Play, "A"));
        agg.ingest(&event_on(day(2024, 3, 11), EventType::Play, "A"));

        let report = agg.finish();
        assert_eq!(report.iter().map(|r| r.plays).sum::<u64>(), 1);
        assert_eq!(report[2].plays, 1);
    }

    #[test]
    fn test_corrupt_line_between_valid_lines() {
        let today = day(2024, 3, 10);
        let mut agg = DailyAggregator::new(StatsWindow::default(), today);

        let served = event_on(today, EventType::VerseServed, "A");
        let line = served.to_json_line().unwrap();

        agg.ingest_line(line.as_bytes());
        agg.ingest_line(b"{\"ts\": garbage");
        agg.ingest_line(line.as_bytes());

        assert_eq!(agg.skipped(), 1);
        assert_eq!(agg.finish()[0].served, 2);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let today = day(2024, 3, 10);
        let events = vec![
            event_on(today, EventType::Visit, "A"),
            event_on(today, EventType::Visit, "B"),
            event_on(day(2024, 3, 9), EventType::Share, "B"),
        ];

        let run = || {
            let mut agg = DailyAggregator::new(StatsWindow::default(), today);
            for e in &events {
                agg.ingest(e);
            }
            agg.finish()
        };

        assert_eq!(run(), run());
    }
}
