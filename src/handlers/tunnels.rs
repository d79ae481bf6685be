//! Tunnel (similarity link) endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::store::models::SourceType;
use crate::store::Store;

fn parse_source_type(raw: &str) -> Result<SourceType, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid source type"))
}

#[derive(Debug, Deserialize)]
pub struct TunnelQuery {
    pub source_type: Option<String>,
    pub source_id: Option<i64>,
}

/// GET /api/v1/tunnels?source_type=task&source_id=1
pub async fn list(
    State(store): State<Arc<Store>>,
    Extension(_auth): Extension<AuthUser>,
    Query(query): Query<TunnelQuery>,
) -> ApiResult {
    let message = "Source type and source ID are required";
    let source_type = query
        .source_type
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request(message))?;
    let source_id = query
        .source_id
        .ok_or_else(|| ApiError::bad_request(message))?;

    let source_type = parse_source_type(source_type)?;
    let tunnels = store.tunnels_for_source(source_type, source_id).await;

    Ok(ApiResponse::ok().data(json!({ "tunnels": tunnels })))
}

#[derive(Debug, Deserialize)]
pub struct GenerateTunnelsRequest {
    pub source_type: Option<String>,
    pub source_id: Option<i64>,
    pub threshold: Option<f64>,
}

/// POST /api/v1/tunnels/generate
///
/// Scores are a stand-in drawn from [0.6, 1.0); the threshold defaults
/// to 0.7.
pub async fn generate(
    State(store): State<Arc<Store>>,
    Extension(_auth): Extension<AuthUser>,
    Json(payload): Json<GenerateTunnelsRequest>,
) -> ApiResult {
    let message = "Source type and source ID are required";
    let source_type = payload
        .source_type
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request(message))?;
    let source_id = payload
        .source_id
        .ok_or_else(|| ApiError::bad_request(message))?;

    let source_type = parse_source_type(source_type)?;
    let threshold = payload.threshold.unwrap_or(0.7);

    let tunnels = store
        .generate_tunnels(source_type, source_id, threshold)
        .await;

    Ok(ApiResponse::ok()
        .message("Tunnels generated successfully")
        .data(json!({
            "generated_tunnels": tunnels.len(),
            "tunnels": tunnels,
        })))
}
