//! Visitor identity
//!
//! Each browser carries an opaque `uid` cookie. A request that presents a
//! usable cookie keeps its id verbatim; any other request is issued a fresh
//! id together with a `Set-Cookie` header that persists it for a year.
//!
//! Ids are a nanosecond clock reading followed by a six digit random suffix.
//! They are not guaranteed unique; a collision only merges two visitors in
//! the daily report.

use std::convert::Infallible;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use rand::Rng;

/// Name of the identity cookie
pub const COOKIE_NAME: &str = "uid";

/// Cookie lifetime in seconds (365 days)
pub const COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Longest cookie value accepted as an existing identity
const MAX_ID_LEN: usize = 128;

/// Resolved identity for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor {
    id: String,
    issued: bool,
}

impl Visitor {
    /// Resolve the identity from an incoming cookie value
    ///
    /// A valid token is returned unchanged with nothing to issue; otherwise a
    /// new id is generated and marked for issuance.
    pub fn resolve(token: Option<&str>) -> Self {
        match token {
            Some(token) if is_valid_token(token) => Self {
                id: token.to_string(),
                issued: false,
            },
            _ => {
                let id = generate_visitor_id();
                tracing::debug!(visitor_id = %id, "issued new visitor id");
                Self { id, issued: true }
            }
        }
    }

    /// The visitor id used to attribute events
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this request was issued a new id
    pub fn is_new(&self) -> bool {
        self.issued
    }

    /// `Set-Cookie` header for a newly issued id, `None` for returning visitors
    ///
    /// Suitable for `axum::response::AppendHeaders`.
    pub fn set_cookie(&self) -> Option<(HeaderName, HeaderValue)> {
        if !self.issued {
            return None;
        }
        HeaderValue::from_str(&set_cookie_value(&self.id))
            .ok()
            .map(|value| (SET_COOKIE, value))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Visitor::resolve(cookie_value(&parts.headers, COOKIE_NAME)))
    }
}

/// Generate a new visitor id
pub fn generate_visitor_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}{:06}", nanos, suffix)
}

/// Full `Set-Cookie` value for an id
pub fn set_cookie_value(id: &str) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        COOKIE_NAME, id, COOKIE_MAX_AGE
    )
}

/// Find a cookie by name across all `Cookie` headers
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_ID_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}
