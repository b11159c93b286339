//! Ingest payload validation

use serde::Deserialize;

use crate::types::{EventMeta, EventType};

/// Why an ingest payload was rejected
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Body is not a JSON object of the expected shape
    #[error("malformed event payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Body is valid JSON but not an object
    #[error("event payload must be a JSON object")]
    NotAnObject,
    /// `type` is absent or empty
    #[error("event type is required")]
    MissingType,
}

/// Fields a client may supply; everything else in the body is ignored
#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(rename = "type", default)]
    event_type: Option<String>,
    #[serde(default)]
    meta: Option<EventMeta>,
}

/// A validated client event, ready to be stamped by the server
#[derive(Debug, Clone, PartialEq)]
pub struct EventPayload {
    pub event_type: EventType,
    /// Never absent: a missing or null `meta` becomes an empty map
    pub meta: EventMeta,
}

/// Validate a raw ingest body
///
/// Client values for `ts`, `uid` and `day` are discarded here; the server
/// assigns them when the event is recorded.
pub fn validate_event_payload(body: &[u8]) -> Result<EventPayload, ValidationError> {
    // Derived deserializers also take sequences positionally
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(ValidationError::NotAnObject);
    }
    let raw: RawPayload = serde_json::from_value(value)?;

    let event_type = match raw.event_type {
        Some(t) if !t.is_empty() => EventType::from(t),
        _ => return Err(ValidationError::MissingType),
    };

    Ok(EventPayload {
        event_type,
        meta: raw.meta.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payload() {
        let payload = validate_event_payload(br#"{"type":"play","meta":{"verse_key":"2:286"}}"#)
            .unwrap();
        assert_eq!(payload.event_type, EventType::Play);
        assert_eq!(payload.meta.get("verse_key").map(String::as_str), Some("2:286"));
    }

    #[test]
    fn test_meta_defaults_to_empty() {
        let payload = validate_event_payload(br#"{"type":"visit"}"#).unwrap();
        assert!(payload.meta.is_empty());

        let payload = validate_event_payload(br#"{"type":"visit","meta":null}"#).unwrap();
        assert!(payload.meta.is_empty());
    }

    #[test]
    fn test_client_stamps_are_ignored() {
        let payload = validate_event_payload(
            br#"{"type":"share","uid":"forged","day":"1999-01-01","ts":"1999-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(payload.event_type, EventType::Share);
    }

    #[test]
    fn test_custom_type_is_accepted() {
        let payload = validate_event_payload(br#"{"type":"install"}"#).unwrap();
        assert_eq!(payload.event_type, EventType::Other("install".to_string()));
    }

    #[test]
    fn test_missing_type_is_rejected() {
        assert!(matches!(
            validate_event_payload(br#"{"meta":{}}"#),
            Err(ValidationError::MissingType)
        ));
        assert!(matches!(
            validate_event_payload(br#"{"type":""}"#),
            Err(ValidationError::MissingType)
        ));
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        let bodies: [&[u8]; 5] = [
            b"",
            b"not json",
            br#"{"type":"play""#,
            br#"{"type":5}"#,
            br#"{"type":"play","meta":{"n":1}}"#,
        ];
        for body in bodies {
            assert!(matches!(
                validate_event_payload(body),
                Err(ValidationError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let bodies: [&[u8]; 5] = [
            br#"["play"]"#,
            br#"["play", null]"#,
            br#"["play", {"verse_key":"1:1"}]"#,
            br#""play""#,
            b"null",
        ];
        for body in bodies {
            assert!(matches!(
                validate_event_payload(body),
                Err(ValidationError::NotAnObject)
            ));
        }
    }
}
