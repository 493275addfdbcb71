//! Error handling for the proxy

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    #[serde(rename = "statusText", skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("x-api-key header is required.")]
    MissingApiKey,

    #[error("Invalid API key.")]
    InvalidApiKey,

    #[error("{0} is required.")]
    MissingParameter(&'static str),

    #[error("Invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Upstream answered with a non-success status or couldn't be reached.
    #[error("request failed.")]
    Upstream { status_text: String },

    /// Upstream answered but the response didn't have the expected shape.
    #[error("Could not extract {0} from the upstream response.")]
    Extraction(&'static str),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingApiKey
            | ApiError::MissingParameter(_)
            | ApiError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ApiError::Upstream { .. } | ApiError::Extraction(_) => StatusCode::CONFLICT,
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        ApiError::Upstream {
            status_text: err.status_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let status_text = match &self {
            ApiError::Upstream { status_text } => Some(status_text.clone()),
            _ => None,
        };
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.to_string(),
            status_text,
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
