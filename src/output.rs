//! JSON payloads written to stdout.
//!
//! The payload shape is the success signal for the calling pipeline: a bare
//! array means success, an object with an `error` key means failure. Exactly
//! one JSON document is printed per invocation and nothing else ever goes to
//! stdout.

use serde::Serialize;

/// Failure payload, e.g. `{"error":"embed_failed","detail":"..."}`.
///
/// Field order matters to downstream log scrapers: `error` comes first.
#[derive(Serialize)]
struct ErrorReport<'a> {
    error: &'a str,
    detail: &'a str,
}

/// Serialize a feature vector as a JSON array.
#[must_use]
pub fn vector_json(features: &[f32]) -> String {
    // A slice of plain floats cannot fail to serialize
    serde_json::to_string(features).unwrap_or_else(|_| "[]".to_string())
}

/// Serialize a failure as `{"error": tag, "detail": message}`.
#[must_use]
pub fn error_json(tag: &str, detail: &str) -> String {
    let report = ErrorReport { error: tag, detail };
    serde_json::to_string(&report)
        .unwrap_or_else(|_| format!("{{\"error\":\"{tag}\",\"detail\":\"\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TAG_EMBED_FAILED, TAG_IMAGE_LOAD_FAILED};
    use serde_json::Value;

    #[test]
    fn vector_json_is_a_bare_array() {
        let json = vector_json(&[0.5, -0.25, 1.0]);
        assert_eq!(json, "[0.5,-0.25,1.0]");

        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_array());
        assert_eq!(parsed.as_array().unwrap().len(), 3);
    }

    #[test]
    fn vector_json_empty_vector() {
        assert_eq!(vector_json(&[]), "[]");
    }

    #[test]
    fn error_json_has_error_key_first() {
        let json = error_json(TAG_EMBED_FAILED, "boom");
        assert_eq!(json, "{\"error\":\"embed_failed\",\"detail\":\"boom\"}");
    }

    #[test]
    fn error_json_round_trips_as_object() {
        let json = error_json(TAG_IMAGE_LOAD_FAILED, "404 Not Found");
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_object());
        assert_eq!(parsed["error"], "image_load_failed");
        assert_eq!(parsed["detail"], "404 Not Found");
    }

    #[test]
    fn error_json_escapes_detail() {
        let json = error_json(TAG_EMBED_FAILED, "a \"quoted\" message\nwith newline");
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["detail"], "a \"quoted\" message\nwith newline");
    }
}
