//! Task dependency (blocked-by) endpoints.

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
use crate::store::models::DependencyStatus;
use crate::store::Store;

#[derive(Debug, Deserialize)]
pub struct CreateDependencyRequest {
    pub task_id: Option<i64>,
    pub blocked_by: Option<i64>,
}

/// POST /api/v1/dependencies
///
/// The caller must belong to the projects of both ends of the edge.
pub async fn create(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateDependencyRequest>,
) -> ApiResult {
    let message = "Task ID and blocked by task ID are required";
    let task_id = payload
        .task_id
        .ok_or_else(|| ApiError::bad_request(message))?;
    let blocked_by = payload
        .blocked_by
        .ok_or_else(|| ApiError::bad_request(message))?;

    let task = store.task_by_id(task_id).await;
    let blocking_task = store.task_by_id(blocked_by).await;
    let (task, blocking_task) = match (task, blocking_task) {
        (Some(task), Some(blocking_task)) => (task, blocking_task),
        _ => return Err(ApiError::not_found("One or both tasks not found")),
    };

    policy::require_member(&store, task.project_id, &auth).await?;
    policy::require_member(&store, blocking_task.project_id, &auth).await?;

    let dependency = store.create_dependency(task_id, blocked_by).await;

    Ok(ApiResponse::created()
        .message("Dependency created successfully")
        .data(dependency))
}

#[derive(Debug, Deserialize)]
pub struct UpdateDependencyRequest {
    pub status: Option<String>,
}

/// PATCH /api/v1/dependencies/:id
pub async fn update(
    State(store): State<Arc<Store>>,
    Extension(_auth): Extension<AuthUser>,
    Path(dependency_id): Path<i64>,
    Json(payload): Json<UpdateDependencyRequest>,
) -> ApiResult {
    let status: DependencyStatus = payload
        .status
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::bad_request("Valid status is required"))?;

    let dependency = store
        .update_dependency_status(dependency_id, status)
        .await?;

    Ok(ApiResponse::ok()
        .message("Dependency status updated")
        .data(json!({
            "dependency_id": dependency.dependency_id,
            "status": dependency.status,
        })))
}

/// DELETE /api/v1/dependencies/:id
pub async fn delete(
    State(store): State<Arc<Store>>,
    Extension(_auth): Extension<AuthUser>,
    Path(dependency_id): Path<i64>,
) -> ApiResult {
    store.delete_dependency(dependency_id).await?;
    Ok(ApiResponse::ok().message("Dependency deleted successfully"))
}

/// GET /api/v1/dependencies/tasks/:id - both-direction view for one task
pub async fn for_task(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<i64>,
) -> ApiResult {
    let task = store
        .task_by_id(task_id)
        .await
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    policy::require_member(&store, task.project_id, &auth).await?;

    let view = store
        .dependency_view(task_id)
        .await
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(ApiResponse::ok().data(view))
}
