//! Validation of client-reported events
//!
//! This module turns a raw `/api/event` body into a trusted payload.

mod event;

pub use event::{validate_event_payload, EventPayload, ValidationError};
