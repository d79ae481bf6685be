//! Task comments.

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

use super::require_field;

/// GET /api/v1/tasks/:id/comments - comments with author names
pub async fn list(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<i64>,
) -> ApiResult {
    let task = store
        .task_by_id(task_id)
        .await
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    policy::require_member(&store, task.project_id, &auth).await?;

    let comments = store.comments_for_task(task_id).await;
    Ok(ApiResponse::ok().data(json!({ "comments": comments })))
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: Option<String>,
}

/// POST /api/v1/tasks/:id/comments
pub async fn create(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> ApiResult {
    let task = store
        .task_by_id(task_id)
        .await
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    policy::require_member(&store, task.project_id, &auth).await?;

    let content = require_field(payload.content.as_deref(), "Content is required")?;
    let comment = store
        .add_comment(task_id, auth.user_id, content.to_string())
        .await;

    Ok(ApiResponse::created()
        .message("Comment added successfully")
        .data(comment))
}

/// PATCH /api/v1/comments/:id
pub async fn update(
    State(store): State<Arc<Store>>,
    Extension(_auth): Extension<AuthUser>,
    Path(comment_id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> ApiResult {
    let content = require_field(payload.content.as_deref(), "Content is required")?;
    let comment = store.update_comment(comment_id, content.to_string()).await?;

    Ok(ApiResponse::ok()
        .message("Comment updated successfully")
        .data(json!({
            "comment_id": comment.comment_id,
            "content": comment.content,
        })))
}

/// DELETE /api/v1/comments/:id
pub async fn delete(
    State(store): State<Arc<Store>>,
    Extension(_auth): Extension<AuthUser>,
    Path(comment_id): Path<i64>,
) -> ApiResult {
    store.delete_comment(comment_id).await?;
    Ok(ApiResponse::ok().message("Comment deleted successfully"))
}
