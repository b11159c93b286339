//! REST API module for HTTP endpoints
//!
//! - `GET /api/random-ayah` - Random verse, records `verse_served`
//! - `POST /api/event` - Client-reported usage event
//! - `GET /api/stats` - Daily report (admin only)

pub mod events;
pub mod stats;
pub mod verse;
