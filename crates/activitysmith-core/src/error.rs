use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Bad or missing job inputs. Raised before any request is attempted.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing input! An API key must be provided.")]
    MissingApiKey,

    #[error("Missing input! An action must be provided.")]
    MissingAction,

    #[error("Missing input! A live activity id must be provided.")]
    MissingLiveActivityId,

    #[error(
        "Invalid input! '{name}' must be one of: true | True | TRUE | false | False | FALSE (got '{value}')"
    )]
    InvalidBoolean { name: String, value: String },

    #[error("Invalid input! Just the payload or payload file path should be used.")]
    ConflictingPayloadSources,

    #[error("Invalid input! No payload found for the request.")]
    MissingPayload,

    #[error("Invalid input! Failed to parse the provided payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid input! Failed to read the payload file '{path}': {source}")]
    PayloadFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input! Failed to parse contents of the payload file '{path}': {details}")]
    PayloadFileParse { path: String, details: String },

    #[error("Invalid input! The payload must be a mapping of keys to values, found {0}")]
    PayloadNotAnObject(&'static str),

    #[error("Invalid input! Payload key '{0}' is used both as a value and as a nested object")]
    DelimiterConflict(String),
}

/// The error surfaced at the job boundary.
///
/// Every failure, whatever its origin, is converted into this type before it
/// leaves the crate. The message is what the workflow log shows; the underlying
/// error, when there is one, stays reachable through [`StdError::source`].
#[derive(Debug)]
pub struct ActivitySmithError {
    message: String,
    cause: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ActivitySmithError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        message: impl Into<String>,
        cause: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Wrap any error, reusing its display text as the message.
    pub fn wrap(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::with_cause(err.to_string(), err)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ActivitySmithError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for ActivitySmithError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<ValidationError> for ActivitySmithError {
    fn from(err: ValidationError) -> Self {
        Self::wrap(err)
    }
}

impl From<std::io::Error> for ActivitySmithError {
    fn from(err: std::io::Error) -> Self {
        Self::wrap(err)
    }
}

impl From<serde_json::Error> for ActivitySmithError {
    fn from(err: serde_json::Error) -> Self {
        Self::wrap(err)
    }
}

pub type Result<T> = std::result::Result<T, ActivitySmithError>;
