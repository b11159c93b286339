//! Event ingest endpoint

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse},
};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::identity::Visitor;
use crate::types::Event;
use crate::validation::validate_event_payload;

/// POST /api/event - Record a client-reported event
///
/// Body: `{"type": "...", "meta": {"k": "v"}}`. The server stamps the time,
/// day and visitor id; any client values for those are ignored.
pub async fn ingest_event(
    State(state): State<Arc<AppState>>,
    visitor: Visitor,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validate_event_payload(&body)?;
    let event = Event::new(payload.event_type, visitor.id(), payload.meta);

    state.record(event).await?;

    Ok((AppendHeaders(visitor.set_cookie()), StatusCode::NO_CONTENT))
}
