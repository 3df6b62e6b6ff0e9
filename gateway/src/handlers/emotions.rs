//! Per-patient emotion endpoints.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /patients/{patient_id}/emotions` | page JSON |
//! | `GET /patients/{patient_id}/emotions/wheel.svg` | wheel as SVG |
//! | `GET /patients/{patient_id}/summary` | summary over every fetched session |
//!
//! All three accept the page query parameters (`limit`, `order`, `cursor`,
//! `emotion`, `from`, `to`). One backend request is made per call.

use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::core::page::{EmotionPage, build_page};
use crate::core::summary::{EmotionSummary, summarize};
use crate::core::view_state::PageParams;
use crate::core::wheel::render_svg;
use crate::errors::{AppError, AppResult};
use crate::feed::FeedResult;
use crate::state::AppState;

const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";

/// Longest patient id accepted in a path.
const MAX_PATIENT_ID_LEN: usize = 64;

fn is_valid_patient_id(patient_id: &str) -> bool {
    !patient_id.is_empty()
        && patient_id.len() <= MAX_PATIENT_ID_LEN
        && patient_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Serialize)]
pub struct EmotionsResponse {
    pub patient_id: String,
    pub source: &'static str,
    #[serde(flatten)]
    pub page: EmotionPage,
    /// Rows dropped at the fetch boundary.
    pub rejected: usize,
    /// True when the backend failed and cached data is shown.
    pub stale: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub patient_id: String,
    #[serde(flatten)]
    pub summary: EmotionSummary,
    pub stale: bool,
    pub error: Option<String>,
}

/// Validates the request and fetches the session batch for it.
async fn load(
    state: &AppState,
    patient_id: &str,
    query: Option<&str>,
) -> AppResult<(PageParams, FeedResult)> {
    if !is_valid_patient_id(patient_id) {
        error!("Invalid patient_id: {}", patient_id);
        return Err(AppError::BadRequest("Invalid patient_id format".to_string()));
    }

    let params = PageParams::parse_with_limit(
        query.unwrap_or_default(),
        state.config.default_display_limit,
    );
    let fetch_query = params.fetch_query(state.config.fetch_limit);
    debug!(
        "Loading emotions for patient {} (query: {})",
        patient_id,
        params.to_query_string()
    );

    let result = state.feed.fetch(patient_id, &fetch_query).await?;
    Ok((params, result))
}

fn page_for(state: &AppState, params: &PageParams, result: &FeedResult) -> EmotionPage {
    build_page(
        &result.batch.sessions,
        params,
        state.config.window_policy,
        &state.render_options,
    )
}

/// `GET /patients/{patient_id}/emotions`
pub async fn get_emotions(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<EmotionsResponse>> {
    let (params, result) = load(&state, &patient_id, query.as_deref()).await?;
    let page = page_for(&state, &params, &result);

    Ok(Json(EmotionsResponse {
        patient_id,
        source: state.feed.source_name(),
        page,
        rejected: result.batch.rejected,
        stale: result.stale,
        error: result.error,
    }))
}

/// `GET /patients/{patient_id}/emotions/wheel.svg`
pub async fn get_wheel_svg(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    let (params, result) = load(&state, &patient_id, query.as_deref()).await?;
    let page = page_for(&state, &params, &result);
    let svg = render_svg(&page.scene);

    let mut response = (StatusCode::OK, svg).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(SVG_CONTENT_TYPE),
    );
    if result.stale {
        headers.insert("X-Data-Stale", HeaderValue::from_static("true"));
    }
    Ok(response)
}

/// `GET /patients/{patient_id}/summary`
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<SummaryResponse>> {
    let (_, result) = load(&state, &patient_id, query.as_deref()).await?;

    Ok(Json(SummaryResponse {
        patient_id,
        summary: summarize(&result.batch.sessions),
        stale: result.stale,
        error: result.error,
    }))
}
