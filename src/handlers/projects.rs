//! Project CRUD and membership endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::policy;
use crate::store::models::{MemberProfile, MemberRole, Project};
use crate::store::Store;

use super::{non_blank, require_field};

/// GET /api/v1/projects - projects the caller belongs to
pub async fn list(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult {
    let projects = store.user_projects(auth.user_id).await;
    Ok(ApiResponse::ok().data(json!({ "projects": projects })))
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// POST /api/v1/projects - create a project; the creator becomes its owner
pub async fn create(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult {
    let message = "Name and description are required";
    let name = require_field(payload.name.as_deref(), message)?;
    let description = require_field(payload.description.as_deref(), message)?;

    let project = store
        .create_project(name.to_string(), description.to_string(), auth.user_id)
        .await;

    Ok(ApiResponse::created()
        .message("Project created successfully")
        .data(project))
}

#[derive(Debug, Serialize)]
struct ProjectDetail {
    #[serde(flatten)]
    project: Project,
    members: Vec<MemberProfile>,
}

/// GET /api/v1/projects/:id - project with member profiles, members only
pub async fn show(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<i64>,
) -> ApiResult {
    let project = store
        .project_by_id(project_id)
        .await
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    policy::require_member(&store, project_id, &auth).await?;

    let members = store.project_member_profiles(project_id).await;
    Ok(ApiResponse::ok().data(json!({
        "project": ProjectDetail { project, members },
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// PATCH /api/v1/projects/:id - owner or global admin only
pub async fn update(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<i64>,
    Json(payload): Json<UpdateProjectRequest>,
) -> ApiResult {
    store
        .project_by_id(project_id)
        .await
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    policy::require_project_admin(&store, project_id, &auth).await?;

    let project = store
        .update_project(
            project_id,
            non_blank(payload.name),
            non_blank(payload.description),
        )
        .await?;

    Ok(ApiResponse::ok()
        .message("Project updated successfully")
        .data(json!({
            "project_id": project.project_id,
            "name": project.name,
            "description": project.description,
        })))
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Option<i64>,
    pub role: Option<String>,
}

/// POST /api/v1/projects/:id/members - owner or global admin only
pub async fn add_member(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<i64>,
    Json(payload): Json<AddMemberRequest>,
) -> ApiResult {
    store
        .project_by_id(project_id)
        .await
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    policy::require_project_admin(&store, project_id, &auth).await?;

    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::bad_request("User ID is required"))?;

    let role = match payload.role.as_deref() {
        None | Some("") => MemberRole::Member,
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::bad_request("Invalid role"))?,
    };

    store
        .find_user_by_id(user_id)
        .await
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let member = store.add_project_member(project_id, user_id, role).await?;

    Ok(ApiResponse::created()
        .message("Member added to project")
        .data(member))
}

/// GET /api/v1/projects/:id/tasks - members only
pub async fn tasks(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<i64>,
) -> ApiResult {
    policy::require_member(&store, project_id, &auth).await?;

    let tasks = store.tasks_by_project(project_id).await;
    Ok(ApiResponse::ok().data(json!({ "tasks": tasks })))
}
