//! Workload endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::policy;
use crate::store::Store;

/// GET /api/v1/workload/users/:id - a user's workload rows (self or admin)
pub async fn for_user(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> ApiResult {
    policy::require_self_or_admin(&auth, user_id)?;

    let workload = store.user_workloads(user_id).await;
    Ok(ApiResponse::ok().data(json!({ "workload": workload })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkloadRequest {
    pub estimated_hours: Option<f64>,
}

/// PATCH /api/v1/workload/:id - adjust the hour estimate
pub async fn update(
    State(store): State<Arc<Store>>,
    Extension(_auth): Extension<AuthUser>,
    Path(workload_id): Path<i64>,
    Json(payload): Json<UpdateWorkloadRequest>,
) -> ApiResult {
    let estimated_hours = payload
        .estimated_hours
        .ok_or_else(|| ApiError::bad_request("Estimated hours is required"))?;

    let workload = store
        .update_workload_hours(workload_id, estimated_hours)
        .await?;

    Ok(ApiResponse::ok()
        .message("Workload updated successfully")
        .data(json!({
            "workload_id": workload.workload_id,
            "estimated_hours": workload.estimated_hours,
        })))
}
