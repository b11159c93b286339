//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::Level;

use super::auth::require_admin;
use super::rest::{events, stats, verse};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Admin surface behind basic auth
    let admin = Router::new()
        .route_service("/admin", ServeFile::new(state.config.admin_page()))
        .route("/api/stats", get(stats::get_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Public API
        .route("/api/random-ayah", get(verse::random_ayah))
        .route("/api/event", post(events::ingest_event))
        .merge(admin)
        // Static assets; `/` resolves to index.html
        .fallback_service(ServeDir::new(&state.config.web_dir))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::Verse;
    use crate::verse::{UpstreamError, VerseSource};
    use axum::body::Body;
    use tower::util::ServiceExt;

    struct Offline;

    #[async_trait::async_trait]
    impl VerseSource for Offline {
        async fn fetch(&self) -> Result<Verse, UpstreamError> {
            Err(UpstreamError::Status(500))
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            event_log_path: temp_dir.path().join("events.log"),
            web_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let app = create_router(Arc::new(AppState::new(config, Arc::new(Offline))));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }
}
