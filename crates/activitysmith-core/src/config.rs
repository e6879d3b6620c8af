use serde::Serialize;
use tracing::debug;

use crate::content::{self, ContentSource, RequestContent};
use crate::error::ValidationError;
use crate::host::SecretSink;
use crate::types::{ActionKind, Secret};

// ---------------------------------------------------------------------------
// RawInputs
// ---------------------------------------------------------------------------

/// Job inputs exactly as the workflow provided them. Empty means unset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawInputs {
    pub action: String,
    pub api_key: Secret,
    pub errors: String,
    pub live_activity_id: String,
    pub payload: String,
    pub payload_delimiter: String,
    pub payload_file_path: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Validated settings for a single run, with the request body already built.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// The action name as given. Kept even when it names no known operation.
    pub action: String,
    #[serde(skip)]
    pub kind: Option<ActionKind>,
    pub api_key: Secret,
    /// Whether a failed request fails the job.
    pub errors: bool,
    pub live_activity_id: Option<String>,
    pub payload: Option<String>,
    pub payload_delimiter: Option<String>,
    pub payload_file_path: Option<String>,
    pub content: RequestContent,
}

impl Config {
    /// Gather, mask, validate, and build the request content.
    ///
    /// The API key is registered with `secrets` before anything else happens,
    /// so no later log line (including validation failures) can print it.
    pub fn load<S>(inputs: RawInputs, secrets: &mut S) -> Result<Self, ValidationError>
    where
        S: SecretSink + ?Sized,
    {
        let api_key = Secret::new(inputs.api_key.expose().trim());
        if !api_key.is_empty() {
            debug!("Setting the provided API key as a secret variable.");
            secrets.set_secret(api_key.expose());
        }

        let errors = parse_bool("errors", &inputs.errors)?;
        let action = inputs.action.trim().to_string();

        if api_key.is_empty() {
            return Err(ValidationError::MissingApiKey);
        }
        if action.is_empty() {
            return Err(ValidationError::MissingAction);
        }

        let kind = action.parse::<ActionKind>().ok();
        let live_activity_id = non_empty(&inputs.live_activity_id);
        if kind.is_some_and(ActionKind::requires_live_activity_id) && live_activity_id.is_none() {
            return Err(ValidationError::MissingLiveActivityId);
        }

        let payload = non_empty(&inputs.payload);
        let payload_delimiter = non_empty(&inputs.payload_delimiter);
        let payload_file_path = non_empty(&inputs.payload_file_path);

        debug!(
            action = %action,
            api_key = ?api_key,
            errors,
            live_activity_id = ?live_activity_id,
            payload = ?payload,
            payload_delimiter = ?payload_delimiter,
            payload_file_path = ?payload_file_path,
            "Gathered action inputs"
        );

        let content = content::build(&ContentSource {
            payload: payload.as_deref().unwrap_or(""),
            payload_file_path: payload_file_path.as_deref().unwrap_or(""),
            payload_delimiter: payload_delimiter.as_deref().unwrap_or(""),
            kind,
            live_activity_id: live_activity_id.as_deref(),
        })?;

        debug!(
            "Parsed request content: {}",
            serde_json::to_string(&content).unwrap_or_default()
        );

        Ok(Self {
            action,
            kind,
            api_key,
            errors,
            live_activity_id,
            payload,
            payload_delimiter,
            payload_file_path,
            content,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// YAML 1.2 core-schema booleans, the same set workflow platforms accept.
/// An empty value is rejected like any other; the default lives in
/// `action.yml` and the CLI, not here.
fn parse_bool(name: &str, value: &str) -> Result<bool, ValidationError> {
    match value.trim() {
        "false" | "False" | "FALSE" => Ok(false),
        "true" | "True" | "TRUE" => Ok(true),
        other => Err(ValidationError::InvalidBoolean {
            name: name.to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;
    use serde_json::json;

    fn inputs(action: &str) -> RawInputs {
        RawInputs {
            action: action.to_string(),
            api_key: Secret::new("sk_live_abc"),
            errors: "false".to_string(),
            payload: r#"{"title":"Deploy"}"#.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn loads_push_notification() {
        let mut host = RecordingHost::default();
        let config = Config::load(inputs("send_push_notification"), &mut host).unwrap();
        assert_eq!(config.kind, Some(ActionKind::SendPushNotification));
        assert_eq!(config.api_key.expose(), "sk_live_abc");
        assert!(!config.errors);
        assert_eq!(config.content.get("title"), Some(&json!("Deploy")));
        assert_eq!(host.secrets(), vec!["sk_live_abc"]);
    }

    #[test]
    fn api_key_is_masked_even_when_validation_fails() {
        let mut host = RecordingHost::default();
        let mut raw = inputs("");
        raw.api_key = Secret::new("  sk_live_abc  ");
        let err = Config::load(raw, &mut host).unwrap_err();
        assert!(matches!(err, ValidationError::MissingAction));
        assert_eq!(host.secrets(), vec!["sk_live_abc"]);
    }

    #[test]
    fn missing_api_key() {
        let mut host = RecordingHost::default();
        let mut raw = inputs("send_push_notification");
        raw.api_key = Secret::default();
        let err = Config::load(raw, &mut host).unwrap_err();
        assert_eq!(err.to_string(), "Missing input! An API key must be provided.");
        assert!(host.secrets().is_empty());
    }

    #[test]
    fn missing_action() {
        let mut host = RecordingHost::default();
        let err = Config::load(inputs("   "), &mut host).unwrap_err();
        assert_eq!(err.to_string(), "Missing input! An action must be provided.");
    }

    #[test]
    fn update_and_end_require_live_activity_id() {
        for action in ["update_live_activity", "end_live_activity"] {
            let mut host = RecordingHost::default();
            let err = Config::load(inputs(action), &mut host).unwrap_err();
            assert!(matches!(err, ValidationError::MissingLiveActivityId));

            let mut raw = inputs(action);
            raw.live_activity_id = "la_1".to_string();
            let config = Config::load(raw, &mut host).unwrap();
            assert_eq!(config.live_activity_id.as_deref(), Some("la_1"));
            assert_eq!(config.content.get("activity_id"), Some(&json!("la_1")));
        }
    }

    #[test]
    fn unknown_action_is_kept_for_the_dispatcher() {
        let mut host = RecordingHost::default();
        let config = Config::load(inputs("cancel_live_activity"), &mut host).unwrap();
        assert_eq!(config.action, "cancel_live_activity");
        assert_eq!(config.kind, None);
    }

    #[test]
    fn errors_flag_parsing() {
        let mut host = RecordingHost::default();
        for (value, expected) in [("TRUE", true), ("True", true), ("false", false), (" true ", true)] {
            let mut raw = inputs("send_push_notification");
            raw.errors = value.to_string();
            assert_eq!(Config::load(raw, &mut host).unwrap().errors, expected);
        }

        for bad in ["yes", "1", ""] {
            let mut raw = inputs("send_push_notification");
            raw.errors = bad.to_string();
            let err = Config::load(raw, &mut host).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidBoolean { ref value, .. } if value == bad));
        }
    }

    #[test]
    fn bad_payload_is_a_validation_error() {
        let mut host = RecordingHost::default();
        let mut raw = inputs("send_push_notification");
        raw.payload = "{ not: valid: json".to_string();
        let err = Config::load(raw, &mut host).unwrap_err();
        assert!(err.to_string().starts_with("Invalid input!"));
    }

    #[test]
    fn serialized_config_hides_the_key() {
        let mut host = RecordingHost::default();
        let config = Config::load(inputs("send_push_notification"), &mut host).unwrap();
        let dumped = serde_json::to_string(&config).unwrap();
        assert!(!dumped.contains("sk_live_abc"));
        assert!(format!("{config:?}").contains("***"));
    }
}
