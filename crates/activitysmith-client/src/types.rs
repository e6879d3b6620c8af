use serde_json::{Map, Value};

/// A request body: always a JSON object, passed to the API as-is.
pub type Request = Map<String, Value>;

// ─── Endpoint ─────────────────────────────────────────────────────────────

/// The remote operations exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    PushNotification,
    StartLiveActivity,
    UpdateLiveActivity,
    EndLiveActivity,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::PushNotification => "/push-notification",
            Endpoint::StartLiveActivity => "/live-activity/start",
            Endpoint::UpdateLiveActivity => "/live-activity/update",
            Endpoint::EndLiveActivity => "/live-activity/end",
        }
    }
}

// ─── ApiResponse ──────────────────────────────────────────────────────────

/// A response with a `2xx` status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body. `Null` for an empty body; a JSON string holding the
    /// raw text when the body is not JSON.
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn value(&self) -> &Value {
        &self.body
    }

    /// Identifier of the Live Activity the response refers to, if any.
    pub fn activity_id(&self) -> Option<String> {
        match self.body.get("activity_id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

// ─── ErrorResponse ────────────────────────────────────────────────────────

/// The response carried by [`ClientError::Response`](crate::ClientError::Response).
///
/// The body is kept as raw text; [`ErrorResponse::json`] parses it on demand
/// since error bodies are not guaranteed to be JSON (proxies, gateways).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub body: String,
}

impl ErrorResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// Parse a successful response body.
pub(crate) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
