//! Data types for the Ayati server
//!
//! This module contains the wire and log structures shared by every component.

mod event;
mod stats;
mod verse;

pub use event::{Event, EventMeta, EventType};
pub use stats::DailyStat;
pub use verse::Verse;
