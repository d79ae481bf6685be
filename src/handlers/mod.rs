//! Request handlers, one module per endpoint group.
//!
//! Every handler follows the same sequence: the auth middleware has already
//! established the principal (except on the public auth routes), then the
//! handler validates the body, fetches referenced entities, consults
//! `policy`, mutates the store, and wraps the result in the success
//! envelope.

pub mod auth;
pub mod comments;
pub mod dependencies;
pub mod mood;
pub mod projects;
pub mod tasks;
pub mod tunnels;
pub mod users;
pub mod workload;

use crate::error::ApiError;

/// Required string field: missing or blank both fail validation, mirroring
/// the API's falsy-field checks.
pub(crate) fn require_field<'a>(
    value: Option<&'a str>,
    message: &str,
) -> Result<&'a str, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(message)),
    }
}

/// Optional string field: blank collapses to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
