//! Daily statistics endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header::CACHE_CONTROL,
    response::IntoResponse,
    Json,
};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::event_store::StatsWindow;
use crate::utils::today;

/// Raw query pairs for the stats endpoint
///
/// Kept as a list so a repeated `days` does not fail extraction.
pub type StatsParams = Vec<(String, String)>;

/// First `days` value in the query, if any
pub fn days_param(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == "days")
        .map(|(_, value)| value.as_str())
}

/// GET /api/stats?days=N - Dense daily report, most recent day first
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let window = StatsWindow::from_query(days_param(&params));
    let report = state.daily_stats(window, today()).await?;

    Ok(([(CACHE_CONTROL, "no-store")], Json(report)))
}
