//! Mood pulse endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::policy;
use crate::store::Store;

use super::non_blank;

#[derive(Debug, Deserialize)]
pub struct MoodPulseRequest {
    pub project_id: Option<i64>,
    pub mood_value: Option<i32>,
    pub comment: Option<String>,
}

/// POST /api/v1/mood - submit a wellbeing rating for a project
pub async fn submit(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<MoodPulseRequest>,
) -> ApiResult {
    let message = "Project ID and mood value are required";
    let project_id = payload
        .project_id
        .ok_or_else(|| ApiError::bad_request(message))?;
    let mood_value = payload
        .mood_value
        .ok_or_else(|| ApiError::bad_request(message))?;

    if !(1..=5).contains(&mood_value) {
        return Err(ApiError::bad_request("Mood value must be between 1 and 5"));
    }

    policy::require_member(&store, project_id, &auth).await?;

    let pulse = store
        .submit_mood_pulse(auth.user_id, project_id, mood_value, non_blank(payload.comment))
        .await;

    Ok(ApiResponse::created()
        .message("Mood pulse submitted successfully")
        .data(pulse))
}

/// GET /api/v1/mood/projects/:id - per-day mood aggregation, members only
pub async fn for_project(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<i64>,
) -> ApiResult {
    policy::require_member(&store, project_id, &auth).await?;

    let summary = store.project_mood_summary(project_id).await;
    Ok(ApiResponse::ok().data(summary))
}
