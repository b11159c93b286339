//! HTTP Basic authentication for the admin surface

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use subtle::ConstantTimeEq;

use super::error::ApiError;
use super::state::AppState;

/// Middleware that requires the configured admin credentials
///
/// Unauthorized requests get a 401 with a `WWW-Authenticate` challenge.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic_auth);

    let authorized = credentials.map_or(false, |(user, pass)| {
        credentials_match(
            &user,
            &pass,
            &state.config.admin_username,
            &state.config.admin_password,
        )
    });

    if !authorized {
        tracing::debug!(path = %request.uri().path(), "rejected admin credentials");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Decode a `Basic` authorization header into `(username, password)`
pub fn parse_basic_auth(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;

    Some((user.to_string(), pass.to_string()))
}

/// Compare both credentials in constant time
///
/// Both comparisons always run so timing does not reveal which one failed.
pub fn credentials_match(user: &str, pass: &str, expected_user: &str, expected_pass: &str) -> bool {
    let user_ok = user.as_bytes().ct_eq(expected_user.as_bytes());
    let pass_ok = pass.as_bytes().ct_eq(expected_pass.as_bytes());
    (user_ok & pass_ok).into()
}
