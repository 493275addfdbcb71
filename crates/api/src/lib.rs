//! HTTP proxy in front of the Voyager company endpoints.
//!
//! Each route checks the caller's API key, performs one upstream fetch and
//! hands the decoded body to the matching extractor from the `extract` crate.

use std::sync::Arc;

use anyhow::Result;
use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod upstream;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use upstream::VoyagerClient;

pub struct AppState {
    pub config: AppConfig,
    pub upstream: VoyagerClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let upstream = VoyagerClient::new(config.upstream.clone())?;
        Ok(Self { config, upstream })
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/company", get(routes::get_company))
        .route("/company/posts", get(routes::get_company_posts))
        .route("/company/jobs", get(routes::get_company_jobs))
        .route("/company/people", get(routes::get_company_people))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        // Liveness stays reachable without a key.
        .route("/health", get(routes::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
