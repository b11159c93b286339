//! Utility functions and helpers
//!
//! This module contains day-bucketing helpers shared by ingest and aggregation.

pub mod time;

pub use time::{day_of, days_before, format_day, today, DAY_FORMAT};
