//! HTTP client for the quran.com random-verse endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::reference::VerseKey;
use super::{UpstreamError, VerseSource};
use crate::types::Verse;

/// Default random-verse endpoint
pub const DEFAULT_VERSE_API_URL: &str = "https://api.quran.com/api/v4/verses/random?language=ar&words=false&fields=text_uthmani,text_simple";

#[derive(Debug, Deserialize)]
struct RandomVerseResponse {
    verse: UpstreamVerse,
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamVerse {
    #[serde(default)]
    verse_key: String,
    #[serde(default)]
    text_uthmani: String,
    #[serde(default)]
    text_simple: String,
}

/// Verse source backed by the quran.com API
pub struct QuranApiClient {
    client: Client,
    url: String,
}

impl QuranApiClient {
    /// Create a client whose requests give up after `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl VerseSource for QuranApiClient {
    async fn fetch(&self) -> Result<Verse, UpstreamError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_random_verse(&body)
    }
}

/// Decode an upstream body into a [`Verse`]
///
/// Prefers the Uthmani script and falls back to the simple text. A missing
/// key, a key that is not `surah:ayah`, or no text at all is an error.
pub fn parse_random_verse(body: &[u8]) -> Result<Verse, UpstreamError> {
    let response: RandomVerseResponse =
        serde_json::from_slice(body).map_err(|e| UpstreamError::Malformed(e.to_string()))?;
    let verse = response.verse;

    if verse.verse_key.is_empty() {
        return Err(UpstreamError::Malformed("missing verse_key".to_string()));
    }
    let key: VerseKey = verse.verse_key.parse()?;

    let text = if verse.text_uthmani.is_empty() {
        verse.text_simple
    } else {
        verse.text_uthmani
    };
    if text.is_empty() {
        return Err(UpstreamError::Malformed("missing verse text".to_string()));
    }

    Ok(Verse::from_key(key, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{http::StatusCode, routing::get, Router};
    use tokio::net::TcpListener;

    use crate::verse::{VerseOrigin, VerseService};

    const SAMPLE_BODY: &str = r#"{"verse":{"verse_key":"94:5","text_uthmani":"فَإِنَّ مَعَ ٱلْعُسْرِ يُسْرًا"}}"#;

    /// Local stand-in for the quran.com API
    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/ok", get(|| async { SAMPLE_BODY }))
            .route("/unavailable", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
            .route("/html", get(|| async { "<html>maintenance</html>" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    SAMPLE_BODY
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    fn client(base: &str, path: &str) -> QuranApiClient {
        QuranApiClient::new(format!("{}{}", base, path), Duration::from_millis(200)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_from_live_endpoint() {
        let base = spawn_upstream().await;
        let verse = client(&base, "/ok").fetch().await.unwrap();
        assert_eq!(verse.verse_key, "94:5");
        assert!(verse.audio_url.ends_with("/094005.mp3"));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let base = spawn_upstream().await;
        let result = client(&base, "/unavailable").fetch().await;
        assert!(matches!(result, Err(UpstreamError::Status(503))));
    }

    #[tokio::test]
    async fn test_fetch_undecodable_body() {
        let base = spawn_upstream().await;
        let result = client(&base, "/html").fetch().await;
        assert!(matches!(result, Err(UpstreamError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let base = spawn_upstream().await;
        let started = std::time::Instant::now();
        let result = client(&base, "/slow").fetch().await;

        match result {
            Err(UpstreamError::Http(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_service_falls_back_on_status_and_timeout() {
        let base = spawn_upstream().await;

        for path in ["/unavailable", "/slow"] {
            let service = VerseService::new(Arc::new(client(&base, path)));
            let served = service.serve().await;
            assert_eq!(served.origin, VerseOrigin::Fallback, "path {}", path);
            assert_eq!(served.event_meta().get("fallback").map(String::as_str), Some("1"));
        }

        let service = VerseService::new(Arc::new(client(&base, "/ok")));
        assert_eq!(service.serve().await.origin, VerseOrigin::Upstream);
    }

    #[test]
    fn test_parse_upstream_verse() {
        let body = r#"{"verse":{"id":42,"verse_key":"2:255","text_uthmani":"ٱللَّهُ","text_simple":"الله"}}"#;
        let verse = parse_random_verse(body.as_bytes()).unwrap();
        assert_eq!(verse.surah, 2);
        assert_eq!(verse.ayah, 255);
        assert_eq!(verse.verse_key, "2:255");
        assert_eq!(verse.text, "ٱللَّهُ");
        assert!(verse.audio_url.ends_with("/002255.mp3"));
    }

    #[test]
    fn test_simple_text_used_when_uthmani_missing() {
        let body = r#"{"verse":{"verse_key":"1:1","text_simple":"بسم الله"}}"#;
        assert_eq!(parse_random_verse(body.as_bytes()).unwrap().text, "بسم الله");
    }

    #[test]
    fn test_rejects_incomplete_payloads() {
        assert!(matches!(
            parse_random_verse(b"<html>"),
            Err(UpstreamError::Malformed(_))
        ));
        assert!(matches!(
            parse_random_verse(br#"{"verse":{"text_uthmani":"x"}}"#),
            Err(UpstreamError::Malformed(_))
        ));
        assert!(matches!(
            parse_random_verse(br#"{"verse":{"verse_key":"1:1"}}"#),
            Err(UpstreamError::Malformed(_))
        ));
        assert!(matches!(
            parse_random_verse(br#"{"verse":{"verse_key":"one","text_simple":"x"}}"#),
            Err(UpstreamError::BadReference(_))
        ));
    }
}
