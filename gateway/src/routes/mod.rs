pub mod api;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::handlers::api::health_check;
use crate::state::AppState;

/// Public health check plus the API routes, with state attached.
///
/// CORS, rate limiting and security headers are layered on in `main.rs`.
pub fn create_app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(api::create_api_router())
        .with_state(state)
}
