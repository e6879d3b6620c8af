//! `activitysmith-client` — async Rust client for the ActivitySmith API.
//!
//! Covers the four operations a workflow job needs: sending a push
//! notification and starting, updating, or ending a Live Activity. Request
//! bodies are passed through as JSON objects; responses come back as the raw
//! status code plus the parsed body so callers can decide what "success" means.
//!
//! # Architecture
//!
//! ```text
//! ActivitySmithApi   ← trait seam; one method per remote operation
//!     │
//!     ▼
//! Client             ← reqwest, bearer auth, JSON in / JSON out
//!     │
//!     ▼
//! ApiResponse        ← 2xx: { status, body }
//! ClientError        ← non-2xx: Response(ErrorResponse { status, body })
//!                      transport: Http(reqwest::Error)
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use activitysmith_client::{ActivitySmithApi, Client};
//! use serde_json::json;
//!
//! let client = Client::new("sk_live_…")?;
//! let request = json!({ "title": "Deploy finished" });
//! let response = client
//!     .send_push_notification(request.as_object().cloned().unwrap_or_default())
//!     .await?;
//! println!("{} {}", response.status, response.value());
//! ```

pub mod client;
pub mod error;
pub mod types;


pub use client::{ActivitySmithApi, Client, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use types::{ApiResponse, Endpoint, ErrorResponse, Request};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClientError>;
