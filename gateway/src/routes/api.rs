use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::{emotions, taxonomy};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router
///
/// The public health check is mounted separately in `create_app_router`.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Static reference data
        .route("/taxonomy", get(taxonomy::get_taxonomy))
        .route("/legend", get(taxonomy::get_legend))
        // Per-patient views
        .route(
            "/patients/{patient_id}/emotions",
            get(emotions::get_emotions),
        )
        .route(
            "/patients/{patient_id}/emotions/wheel.svg",
            get(emotions::get_wheel_svg),
        )
        .route("/patients/{patient_id}/summary", get(emotions::get_summary))
        .layer(TraceLayer::new_for_http())
}
