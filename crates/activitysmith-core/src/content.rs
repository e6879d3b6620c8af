//! Turns the payload inputs into the JSON object sent to the API.
//!
//! At most one source is used: an inline `payload` or a `payload-file-path`.
//! Inline payloads are JSON, or YAML when they do not parse as JSON. Files are
//! read as YAML when their extension says so, JSON otherwise. With a
//! `payload-delimiter`, flat top-level keys such as `alert.title` are expanded
//! into nested objects.

use serde::Serialize;
use serde_json::map::Entry;
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::ValidationError;
use crate::types::ActionKind;

type Result<T> = std::result::Result<T, ValidationError>;

/// Field the API uses to address an existing Live Activity.
pub const ACTIVITY_ID_FIELD: &str = "activity_id";

// ---------------------------------------------------------------------------
// RequestContent
// ---------------------------------------------------------------------------

/// The request body for the selected action. Built once, never modified.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestContent(Map<String, Value>);

impl RequestContent {
    pub fn into_values(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

// ---------------------------------------------------------------------------
// ContentSource
// ---------------------------------------------------------------------------

/// The raw inputs the builder reads. Empty strings mean "not provided".
#[derive(Debug, Clone, Copy)]
pub struct ContentSource<'a> {
    pub payload: &'a str,
    pub payload_file_path: &'a str,
    pub payload_delimiter: &'a str,
    pub kind: Option<ActionKind>,
    pub live_activity_id: Option<&'a str>,
}

pub fn build(source: &ContentSource<'_>) -> Result<RequestContent> {
    let document = match (source.payload.is_empty(), source.payload_file_path.is_empty()) {
        (false, false) => return Err(ValidationError::ConflictingPayloadSources),
        (false, true) => Some(parse_inline(source.payload)?),
        (true, false) => Some(read_file(Path::new(source.payload_file_path))?),
        (true, true) => None,
    };

    let addresses_activity = source
        .kind
        .is_some_and(ActionKind::requires_live_activity_id);

    let mut values = match document {
        Some(doc) => into_object(doc)?,
        // Update and end can be sent with nothing but the activity id.
        None if addresses_activity => Map::new(),
        None => return Err(ValidationError::MissingPayload),
    };

    if !source.payload_delimiter.is_empty() {
        values = expand_keys(values, source.payload_delimiter)?;
    }

    if addresses_activity {
        if let Some(id) = source.live_activity_id {
            values
                .entry(ACTIVITY_ID_FIELD)
                .or_insert_with(|| Value::String(id.to_string()));
        }
    }

    Ok(RequestContent(values))
}

fn parse_inline(text: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => Ok(v),
        Err(json_err) => serde_yaml::from_str::<Value>(text)
            .map_err(|_| ValidationError::InvalidPayload(json_err.to_string())),
    }
}

fn read_file(path: &Path) -> Result<Value> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| ValidationError::PayloadFileRead {
        path: display.clone(),
        source,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        serde_yaml::from_str::<Value>(&text).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<Value>(&text).map_err(|e| e.to_string())
    };
    parsed.map_err(|details| ValidationError::PayloadFileParse {
        path: display,
        details,
    })
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(ValidationError::PayloadNotAnObject("null")),
        Value::Bool(_) => Err(ValidationError::PayloadNotAnObject("a boolean")),
        Value::Number(_) => Err(ValidationError::PayloadNotAnObject("a number")),
        Value::String(_) => Err(ValidationError::PayloadNotAnObject("a string")),
        Value::Array(_) => Err(ValidationError::PayloadNotAnObject("a list")),
    }
}

/// Expand `a<delim>b: v` top-level keys into `{a: {b: v}}`.
fn expand_keys(values: Map<String, Value>, delimiter: &str) -> Result<Map<String, Value>> {
    let mut expanded = Map::new();
    for (key, value) in values {
        let parts: Vec<&str> = key.split(delimiter).collect();
        insert_path(&mut expanded, &parts, value, &key)?;
    }
    Ok(expanded)
}

fn insert_path(target: &mut Map<String, Value>, parts: &[&str], value: Value, key: &str) -> Result<()> {
    let Some((last, parents)) = parts.split_last() else {
        return Ok(());
    };

    let mut node = target;
    for part in parents {
        node = match node
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(map) => map,
            _ => return Err(ValidationError::DelimiterConflict(key.to_string())),
        };
    }

    match node.entry(last.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
        Entry::Occupied(mut slot) => match (slot.get_mut(), value) {
            (Value::Object(existing), Value::Object(incoming)) => {
                for (k, v) in incoming {
                    insert_path(existing, &[k.as_str()], v, key)?;
                }
                Ok(())
            }
            _ => Err(ValidationError::DelimiterConflict(key.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn source(payload: &str) -> ContentSource<'_> {
        ContentSource {
            payload,
            payload_file_path: "",
            payload_delimiter: "",
            kind: Some(ActionKind::SendPushNotification),
            live_activity_id: None,
        }
    }

    #[test]
    fn inline_json_payload() {
        let content = build(&source(r#"{"title":"Deploy","badge":1}"#)).unwrap();
        assert_eq!(content.get("title"), Some(&json!("Deploy")));
        assert_eq!(content.get("badge"), Some(&json!(1)));
    }

    #[test]
    fn inline_yaml_payload() {
        let content = build(&source("title: Deploy finished\nmessage: v1.2.3 is live\n")).unwrap();
        assert_eq!(
            Value::Object(content.into_values()),
            json!({"title": "Deploy finished", "message": "v1.2.3 is live"})
        );
    }

    #[test]
    fn malformed_payload_is_an_error_not_empty_content() {
        let err = build(&source(r#"{"title": "#)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPayload(_)));

        let err = build(&source("just some words")).unwrap_err();
        assert!(matches!(err, ValidationError::PayloadNotAnObject("a string")));

        let err = build(&source("[1, 2]")).unwrap_err();
        assert!(matches!(err, ValidationError::PayloadNotAnObject("a list")));
    }

    #[test]
    fn both_sources_conflict() {
        let mut src = source(r#"{"title":"x"}"#);
        src.payload_file_path = "payload.json";
        let err = build(&src).unwrap_err();
        assert!(matches!(err, ValidationError::ConflictingPayloadSources));
    }

    #[test]
    fn missing_payload_for_push_fails() {
        let err = build(&source("")).unwrap_err();
        assert!(matches!(err, ValidationError::MissingPayload));
    }

    #[test]
    fn end_without_payload_sends_only_the_id() {
        let src = ContentSource {
            kind: Some(ActionKind::EndLiveActivity),
            live_activity_id: Some("la_9"),
            ..source("")
        };
        let content = build(&src).unwrap();
        assert_eq!(Value::Object(content.into_values()), json!({"activity_id": "la_9"}));
    }

    #[test]
    fn update_injects_id_without_overriding_payload() {
        let src = ContentSource {
            kind: Some(ActionKind::UpdateLiveActivity),
            live_activity_id: Some("la_input"),
            ..source(r#"{"content_state":{"title":"Step 2"}}"#)
        };
        assert_eq!(build(&src).unwrap().get("activity_id"), Some(&json!("la_input")));

        let src = ContentSource {
            kind: Some(ActionKind::UpdateLiveActivity),
            live_activity_id: Some("la_input"),
            ..source(r#"{"activity_id":"la_payload"}"#)
        };
        assert_eq!(build(&src).unwrap().get("activity_id"), Some(&json!("la_payload")));
    }

    #[test]
    fn start_does_not_get_an_activity_id() {
        let src = ContentSource {
            kind: Some(ActionKind::StartLiveActivity),
            live_activity_id: Some("la_1"),
            ..source(r#"{"content_state":{"title":"Deploy"}}"#)
        };
        assert_eq!(build(&src).unwrap().get("activity_id"), None);
    }

    #[test]
    fn delimiter_expands_flat_keys() {
        let src = ContentSource {
            payload_delimiter: ".",
            ..source(
                r#"{"content_state.title":"Deploy","content_state.current_step":2,"content_state.extra":{"a":1},"title":"x"}"#,
            )
        };
        let content = build(&src).unwrap();
        assert_eq!(
            Value::Object(content.into_values()),
            json!({
                "title": "x",
                "content_state": {"title": "Deploy", "current_step": 2, "extra": {"a": 1}}
            })
        );
    }

    #[test]
    fn delimiter_merges_into_existing_object() {
        let src = ContentSource {
            payload_delimiter: "__",
            ..source(r#"{"content_state":{"title":"Deploy"},"content_state__number_of_steps":4}"#)
        };
        let content = build(&src).unwrap();
        assert_eq!(
            content.get("content_state"),
            Some(&json!({"title": "Deploy", "number_of_steps": 4}))
        );
    }

    #[test]
    fn delimiter_conflict_is_reported() {
        let src = ContentSource {
            payload_delimiter: ".",
            ..source(r#"{"alert":"plain","alert.title":"nested"}"#)
        };
        let err = build(&src).unwrap_err();
        assert!(matches!(err, ValidationError::DelimiterConflict(k) if k == "alert.title"));
    }

    #[test]
    fn payload_file_json_and_yaml() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("payload.json");
        std::fs::write(&json_path, r#"{"title":"From JSON"}"#).unwrap();
        let yaml_path = dir.path().join("payload.yml");
        std::fs::write(&yaml_path, "title: From YAML\n").unwrap();

        for (path, title) in [(&json_path, "From JSON"), (&yaml_path, "From YAML")] {
            let path = path.to_str().unwrap();
            let src = ContentSource {
                payload_file_path: path,
                ..source("")
            };
            assert_eq!(build(&src).unwrap().get("title"), Some(&json!(title)));
        }
    }

    #[test]
    fn payload_file_errors_name_the_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        let missing = missing.to_str().unwrap();
        let err = build(&ContentSource {
            payload_file_path: missing,
            ..source("")
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::PayloadFileRead { .. }));
        assert!(err.to_string().contains("missing.json"));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "title: not json").unwrap();
        let bad = bad.to_str().unwrap();
        let err = build(&ContentSource {
            payload_file_path: bad,
            ..source("")
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::PayloadFileParse { .. }));
    }
}
