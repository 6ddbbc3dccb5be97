//! Request-level error taxonomy.
//!
//! Every failure a request can hit is a [`RelayError`]. At the HTTP boundary
//! it renders as `{"error": "<message>"}` with a status code matching its
//! kind; nothing here ever takes the server down.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::extract::ExtractError;
use crate::upstream::UpstreamError;

/// Message returned when no upstream key is configured.
pub const MISSING_API_KEY: &str =
    "Server missing Gemini API key. Set GEMINI_API_KEY or VITE_GEMINI_API_KEY.";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Bad input from the caller: blank query, wrong file type, no file.
    #[error("{0}")]
    Validation(String),

    /// The server is missing something it needs, such as the API key.
    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The whole document could not be read.
    #[error(transparent)]
    Extraction(ExtractError),

    /// PDF support is not built into this binary.
    #[error("{0}")]
    DependencyMissing(String),
}

impl From<ExtractError> for RelayError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Unavailable => RelayError::DependencyMissing(err.to_string()),
            other => RelayError::Extraction(other),
        }
    }
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            RelayError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RelayError::DependencyMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
