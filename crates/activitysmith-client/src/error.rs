use thiserror::Error;

use crate::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a status outside `200..300`.
    #[error("Response returned an error code")]
    Response(ErrorResponse),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),
}

impl ClientError {
    /// The HTTP response attached to the error, if the server produced one.
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            ClientError::Response(r) => Some(r),
            ClientError::Http(_) | ClientError::InvalidApiKey(_) => None,
        }
    }
}
