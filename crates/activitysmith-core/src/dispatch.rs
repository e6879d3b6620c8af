//! Performs the configured API call and publishes its outcome as outputs.
//!
//! Both paths write `ok` and `response` before returning, so a run never
//! ends with those outputs unset.

use activitysmith_client::{ActivitySmithApi, ApiResponse, ClientError, Request};
use futures::future::BoxFuture;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{ActivitySmithError, Result};
use crate::host::{outputs, Host};
use crate::types::ActionKind;

const UNKNOWN_ACTION: &str = "Unknown action.";
const UNKNOWN_ERROR: &str = "Unknown error";

// ---------------------------------------------------------------------------
// Operation table
// ---------------------------------------------------------------------------

type Call = for<'a> fn(
    &'a dyn ActivitySmithApi,
    Request,
) -> BoxFuture<'a, activitysmith_client::Result<ApiResponse>>;

/// A remote operation bound to an [`ActionKind`].
#[derive(Clone, Copy)]
pub struct Operation {
    /// Shown in the log line announcing the request.
    pub description: &'static str,
    call: Call,
}

/// The operation for each action. The match is exhaustive, so adding an
/// `ActionKind` without an operation does not compile.
pub fn operation(kind: ActionKind) -> Operation {
    match kind {
        ActionKind::SendPushNotification => Operation {
            description: "push notification",
            call: send_push_notification,
        },
        ActionKind::StartLiveActivity => Operation {
            description: "start live activity",
            call: start_live_activity,
        },
        ActionKind::UpdateLiveActivity => Operation {
            description: "update live activity",
            call: update_live_activity,
        },
        ActionKind::EndLiveActivity => Operation {
            description: "end live activity",
            call: end_live_activity,
        },
    }
}

fn send_push_notification(
    api: &dyn ActivitySmithApi,
    request: Request,
) -> BoxFuture<'_, activitysmith_client::Result<ApiResponse>> {
    api.send_push_notification(request)
}

fn start_live_activity(
    api: &dyn ActivitySmithApi,
    request: Request,
) -> BoxFuture<'_, activitysmith_client::Result<ApiResponse>> {
    api.start_live_activity(request)
}

fn update_live_activity(
    api: &dyn ActivitySmithApi,
    request: Request,
) -> BoxFuture<'_, activitysmith_client::Result<ApiResponse>> {
    api.update_live_activity(request)
}

fn end_live_activity(
    api: &dyn ActivitySmithApi,
    request: Request,
) -> BoxFuture<'_, activitysmith_client::Result<ApiResponse>> {
    api.end_live_activity(request)
}

// ---------------------------------------------------------------------------
// OperationResult
// ---------------------------------------------------------------------------

/// What a successful call produced, as published in the outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    /// `200 <= status < 300`.
    pub ok: bool,
    pub status: u16,
    pub body: Value,
    pub live_activity_id: Option<String>,
}

/// Why no usable response came back.
#[derive(Debug)]
enum Failure {
    UnknownAction,
    Client(ClientError),
}

impl Failure {
    fn into_cause(self) -> Option<ClientError> {
        match self {
            Failure::UnknownAction => None,
            Failure::Client(e) => Some(e),
        }
    }
}

/// A failure reduced to what the outputs and logs need.
#[derive(Debug)]
struct ResolvedFailure {
    message: String,
    status: Option<u16>,
    /// The error body, when the server sent one that parses as JSON.
    api_response: Option<Value>,
}

// ---------------------------------------------------------------------------
// dispatch
// ---------------------------------------------------------------------------

/// Call the API for `config.action` and publish `ok`, `response`, and
/// `live_activity_id`.
///
/// `connect` builds the client from the API key; it runs once per call.
pub async fn dispatch<C, F, H>(config: &Config, connect: F, host: &mut H) -> Result<OperationResult>
where
    C: ActivitySmithApi,
    F: FnOnce(&str) -> activitysmith_client::Result<C>,
    H: Host + ?Sized,
{
    match call(config, connect).await {
        Ok(response) => publish_success(response, host),
        Err(failure) => Err(publish_failure(config, failure, host)?),
    }
}

async fn call<C, F>(config: &Config, connect: F) -> std::result::Result<ApiResponse, Failure>
where
    C: ActivitySmithApi,
    F: FnOnce(&str) -> activitysmith_client::Result<C>,
{
    let client = connect(config.api_key.expose()).map_err(Failure::Client)?;
    let Some(op) = config.kind.map(operation) else {
        return Err(Failure::UnknownAction);
    };

    info!("Making ActivitySmith {} request...", op.description);
    (op.call)(&client, config.content.clone().into_values())
        .await
        .map_err(Failure::Client)
}

fn publish_success<H>(response: ApiResponse, host: &mut H) -> Result<OperationResult>
where
    H: Host + ?Sized,
{
    let status = response.status;
    let ok = (200..300).contains(&status);
    let body_json = serde_json::to_string(response.value())?;

    info!("✅ Success! - {status}");
    info!("Response: {body_json}");

    host.set_output(outputs::OK, bool_str(ok))?;
    host.set_output(outputs::RESPONSE, &body_json)?;

    let live_activity_id = response.activity_id();
    if let Some(id) = &live_activity_id {
        host.set_output(outputs::LIVE_ACTIVITY_ID, id)?;
    }

    debug!("{body_json}");

    Ok(OperationResult {
        ok,
        status,
        body: response.body,
        live_activity_id,
    })
}

/// Publish the failure outputs and build the error to return.
///
/// Errors from writing the outputs themselves take precedence over the
/// request failure.
fn publish_failure<H>(config: &Config, failure: Failure, host: &mut H) -> Result<ActivitySmithError>
where
    H: Host + ?Sized,
{
    let resolved = resolve(&failure);

    if config.errors {
        log_failure(&resolved);
    }

    let response = match &resolved.api_response {
        Some(body) => serde_json::to_string(body)?,
        None => serde_json::to_string(&resolved.message)?,
    };
    host.set_output(outputs::OK, bool_str(false))?;
    host.set_output(outputs::RESPONSE, &response)?;

    let detail = match &resolved.api_response {
        Some(body) => body.clone(),
        None => json!({ "message": resolved.message }),
    };
    debug!("{detail}");

    Ok(match failure.into_cause() {
        Some(cause) => ActivitySmithError::with_cause(resolved.message, cause),
        None => ActivitySmithError::new(resolved.message),
    })
}

fn resolve(failure: &Failure) -> ResolvedFailure {
    let err = match failure {
        Failure::UnknownAction => {
            return ResolvedFailure {
                message: UNKNOWN_ACTION.to_string(),
                status: None,
                api_response: None,
            }
        }
        Failure::Client(err) => err,
    };

    let mut message = err.to_string();
    if message.is_empty() {
        message = UNKNOWN_ERROR.to_string();
    }

    let response = err.response();
    let status = response.map(|r| r.status);
    // A body that is not JSON (or is JSON null) counts as no body at all.
    let api_response = response
        .and_then(|r| r.json().ok())
        .filter(|body| !body.is_null());

    if let Some(api_error) = api_response
        .as_ref()
        .and_then(|b| b.get("error"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        message = api_error.to_string();
    }

    ResolvedFailure {
        message,
        status,
        api_response,
    }
}

fn log_failure(resolved: &ResolvedFailure) {
    error!("❌ {}", resolved.message);

    if let Some(body) = &resolved.api_response {
        let api_error = match body.get("error") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        if !api_error.is_empty() && api_error != resolved.message {
            error!("API Error: {api_error}");
        }
        if let Some(api_message) = body.get("message").and_then(Value::as_str) {
            error!("API Message: {api_message}");
        }
    }

    if let Some(status) = resolved.status {
        error!("Status: {status}");
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
