use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::debug;

use crate::types::{parse_body, ApiResponse, Endpoint, ErrorResponse, Request};
use crate::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "https://activitysmith.com/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ─── ActivitySmithApi ─────────────────────────────────────────────────────

/// The remote operations, one method each.
///
/// Every method resolves to `Ok` only for a `2xx` status. Any other status
/// becomes [`ClientError::Response`] carrying the status and the raw body.
///
/// Methods return boxed futures so the trait stays object-safe and callers
/// can hold `&dyn ActivitySmithApi` or plain function pointers to them.
pub trait ActivitySmithApi: Send + Sync {
    fn send_push_notification(&self, request: Request) -> BoxFuture<'_, Result<ApiResponse>>;

    fn start_live_activity(&self, request: Request) -> BoxFuture<'_, Result<ApiResponse>>;

    fn update_live_activity(&self, request: Request) -> BoxFuture<'_, Result<ApiResponse>>;

    fn end_live_activity(&self, request: Request) -> BoxFuture<'_, Result<ApiResponse>>;
}

// ─── Client ───────────────────────────────────────────────────────────────

/// HTTP implementation of [`ActivitySmithApi`].
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Build a client against the production API.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Build a client against an arbitrary base URL (staging, mock servers).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ClientError::InvalidApiKey(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("activitysmith-action/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, endpoint: Endpoint, request: Request) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        debug!(%url, "POST");

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        if (200..300).contains(&status) {
            Ok(ApiResponse::new(status, parse_body(&text)))
        } else {
            Err(ClientError::Response(ErrorResponse::new(status, text)))
        }
    }
}

impl ActivitySmithApi for Client {
    fn send_push_notification(&self, request: Request) -> BoxFuture<'_, Result<ApiResponse>> {
        self.post(Endpoint::PushNotification, request).boxed()
    }

    fn start_live_activity(&self, request: Request) -> BoxFuture<'_, Result<ApiResponse>> {
        self.post(Endpoint::StartLiveActivity, request).boxed()
    }

    fn update_live_activity(&self, request: Request) -> BoxFuture<'_, Result<ApiResponse>> {
        self.post(Endpoint::UpdateLiveActivity, request).boxed()
    }

    fn end_live_activity(&self, request: Request) -> BoxFuture<'_, Result<ApiResponse>> {
        self.post(Endpoint::EndLiveActivity, request).boxed()
    }
}
