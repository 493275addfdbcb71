//! Static API-key check for every proxied route.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(provided) = request.headers().get(API_KEY_HEADER) else {
        debug!(path = request.uri().path(), "Rejected request without API key");
        return Err(ApiError::MissingApiKey);
    };

    if !state.config.api_key.matches(provided.as_bytes()) {
        debug!(path = request.uri().path(), "Rejected request with wrong API key");
        return Err(ApiError::InvalidApiKey);
    }

    Ok(next.run(request).await)
}
