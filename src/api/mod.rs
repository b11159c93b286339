//! API module for the HTTP surface
//!
//! This module wires the verse, event and stats endpoints, the admin
//! basic-auth layer and static file serving into one Axum router.

pub mod auth;
pub mod error;
pub mod http;
pub mod rest;
pub mod state;

pub use error::ApiError;
pub use http::create_router;
pub use state::AppState;
