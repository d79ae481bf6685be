//! Registration, login, current-user and password-change endpoints.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::store::models::UserRole;
use crate::store::Store;

use super::require_field;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(store): State<Arc<Store>>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult {
    let message = "Name, email, and password are required";
    let name = require_field(payload.name.as_deref(), message)?;
    let email = require_field(payload.email.as_deref(), message)?;
    let password = require_field(payload.password.as_deref(), message)?;

    let role = match payload.role.as_deref() {
        None | Some("") => UserRole::Member,
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::bad_request("Invalid role"))?,
    };

    let password_hash = auth::hash_password(password)?;
    let user = store
        .create_user(name.to_string(), email.to_string(), password_hash, role)
        .await?;

    Ok(ApiResponse::created()
        .message("User registered successfully")
        .data(user))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/v1/auth/login
///
/// Unknown email and wrong password both answer with the same 401 so the
/// endpoint does not leak which accounts exist.
pub async fn login(
    State(store): State<Arc<Store>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult {
    let message = "Email and password are required";
    let email = require_field(payload.email.as_deref(), message)?;
    let password = require_field(payload.password.as_deref(), message)?;

    let user = store
        .find_user_by_email(email)
        .await
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !auth::verify_password(password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = auth::generate_token(&user)?;
    Ok(ApiResponse::ok().token(token).data(json!({ "user": user })))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(store): State<Arc<Store>>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult {
    let user = store
        .find_user_by_id(auth_user.user_id)
        .await
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::ok().data(user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(store): State<Arc<Store>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult {
    let message = "Current password and new password are required";
    let current = require_field(payload.current_password.as_deref(), message)?;
    let new = require_field(payload.new_password.as_deref(), message)?;

    let user = store
        .find_user_by_id(auth_user.user_id)
        .await
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !auth::verify_password(current, &user.password_hash) {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    let password_hash = auth::hash_password(new)?;
    store.set_password(user.user_id, password_hash).await?;

    Ok(ApiResponse::ok().message("Password updated successfully"))
}
