//! Task CRUD and assignment endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::policy;
use crate::store::models::{AssigneeProfile, Task, TaskStatus};
use crate::store::{Store, TaskUpdate};

use super::{non_blank, require_field};

fn parse_status(raw: &str) -> Result<TaskStatus, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid task status"))
}

fn parse_due_date(raw: &str) -> Result<NaiveDate, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid due date"))
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub project_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

/// POST /api/v1/tasks - create a task in a project the caller belongs to
pub async fn create(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult {
    let message = "Project ID, title, and description are required";
    let project_id = payload
        .project_id
        .ok_or_else(|| ApiError::bad_request(message))?;
    let title = require_field(payload.title.as_deref(), message)?;
    let description = require_field(payload.description.as_deref(), message)?;

    let status = match payload.status.as_deref() {
        None | Some("") => TaskStatus::Todo,
        Some(raw) => parse_status(raw)?,
    };
    let due_date = match payload.due_date.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(parse_due_date(raw)?),
    };

    policy::require_member(&store, project_id, &auth).await?;

    let task = store
        .create_task(
            project_id,
            title.to_string(),
            description.to_string(),
            status,
            due_date,
            auth.user_id,
        )
        .await;

    Ok(ApiResponse::created()
        .message("Task created successfully")
        .data(task))
}

#[derive(Debug, Serialize)]
struct TaskDetail {
    #[serde(flatten)]
    task: Task,
    assignees: Vec<AssigneeProfile>,
}

/// GET /api/v1/tasks/:id - task with assignee profiles, members only
pub async fn show(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<i64>,
) -> ApiResult {
    let task = store
        .task_by_id(task_id)
        .await
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    policy::require_member(&store, task.project_id, &auth).await?;

    let assignees = store.task_assignee_profiles(task_id).await;
    Ok(ApiResponse::ok().data(json!({
        "task": TaskDetail { task, assignees },
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

/// PATCH /api/v1/tasks/:id
pub async fn update(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<i64>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult {
    let task = store
        .task_by_id(task_id)
        .await
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    policy::require_member(&store, task.project_id, &auth).await?;

    let status = match payload.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(parse_status(raw)?),
    };
    let due_date = match payload.due_date.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(parse_due_date(raw)?),
    };

    let task = store
        .update_task(
            task_id,
            TaskUpdate {
                title: non_blank(payload.title),
                description: non_blank(payload.description),
                status,
                due_date,
            },
        )
        .await?;

    Ok(ApiResponse::ok()
        .message("Task updated successfully")
        .data(json!({
            "task_id": task.task_id,
            "title": task.title,
            "status": task.status,
        })))
}

#[derive(Debug, Deserialize)]
pub struct AssignTaskRequest {
    pub user_id: Option<i64>,
}

/// POST /api/v1/tasks/:id/assignments
///
/// The assignee must already belong to the task's project; the assignment
/// also refreshes their workload row.
pub async fn assign(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<i64>,
    Json(payload): Json<AssignTaskRequest>,
) -> ApiResult {
    let task = store
        .task_by_id(task_id)
        .await
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    policy::require_member(&store, task.project_id, &auth).await?;

    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::bad_request("User ID is required"))?;

    store
        .find_user_by_id(user_id)
        .await
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !store.is_project_member(task.project_id, user_id).await {
        return Err(ApiError::forbidden(
            "User is not a member of this project",
        ));
    }

    let assignment = store.assign_task(task_id, user_id).await?;

    Ok(ApiResponse::created()
        .message("Task assigned successfully")
        .data(assignment))
}
