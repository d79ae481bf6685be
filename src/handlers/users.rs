//! User listing and profile endpoints.

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
use crate::store::models::{ProjectRole, User};
use crate::store::Store;

use super::non_blank;

/// GET /api/v1/users - admin only
pub async fn list(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult {
    policy::require_admin(&auth)?;

    let users = store.list_users().await;
    Ok(ApiResponse::ok().data(json!({ "users": users })))
}

#[derive(Debug, Serialize)]
struct UserProfile {
    #[serde(flatten)]
    user: User,
    projects: Vec<ProjectRole>,
}

/// GET /api/v1/users/:id - profile with project roles (self or admin)
pub async fn show(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> ApiResult {
    let user = store
        .find_user_by_id(user_id)
        .await
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    policy::require_self_or_admin(&auth, user_id)?;

    let projects = store.user_project_roles(user_id).await;
    Ok(ApiResponse::ok().data(json!({
        "user": UserProfile { user, projects },
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// PATCH /api/v1/users/:id - update name/email (self or admin)
pub async fn update(
    State(store): State<Arc<Store>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult {
    store
        .find_user_by_id(user_id)
        .await
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    policy::require_self_or_admin(&auth, user_id)?;

    let user = store
        .update_user(user_id, non_blank(payload.name), non_blank(payload.email))
        .await?;

    Ok(ApiResponse::ok()
        .message("User updated successfully")
        .data(json!({
            "user_id": user.user_id,
            "name": user.name,
            "email": user.email,
        })))
}
