//! Random verse endpoint

use std::sync::Arc;

use axum::{
    extract::State,
    http::header::CACHE_CONTROL,
    response::{AppendHeaders, IntoResponse},
    Json,
};

use crate::api::state::AppState;
use crate::identity::Visitor;
use crate::types::{Event, EventType};

/// GET /api/random-ayah - Serve one verse
///
/// The `verse_served` event is handed off before the response is returned
/// and written in the background; a logging failure never reaches the client.
pub async fn random_ayah(State(state): State<Arc<AppState>>, visitor: Visitor) -> impl IntoResponse {
    let served = state.verses.serve().await;
    let event = Event::new(EventType::VerseServed, visitor.id(), served.event_meta());

    let response = (
        AppendHeaders(visitor.set_cookie()),
        [(CACHE_CONTROL, "no-store")],
        Json(served.verse),
    );

    state.record_in_background(event);
    response
}
