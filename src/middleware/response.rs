use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Builder for the fixed success envelope
/// `{"status": "success", "message"?, "token"?, "data"?}`.
#[derive(Debug)]
pub struct ApiResponse {
    status_code: StatusCode,
    message: Option<String>,
    token: Option<String>,
    data: Option<serde_json::Result<Value>>,
}

impl ApiResponse {
    /// 200 OK response
    pub fn ok() -> Self {
        Self::with_status(StatusCode::OK)
    }

    /// 201 Created response
    pub fn created() -> Self {
        Self::with_status(StatusCode::CREATED)
    }

    fn with_status(status_code: StatusCode) -> Self {
        Self {
            status_code,
            message: None,
            token: None,
            data: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Login only: surfaces the bearer token at the envelope top level.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn data(mut self, data: impl Serialize) -> Self {
        self.data = Some(serde_json::to_value(data));
        self
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut envelope = Map::new();
        envelope.insert("status".into(), Value::String("success".into()));

        if let Some(message) = self.message {
            envelope.insert("message".into(), Value::String(message));
        }
        if let Some(token) = self.token {
            envelope.insert("token".into(), Value::String(token));
        }
        match self.data {
            Some(Ok(value)) => {
                envelope.insert("data".into(), value);
            }
            Some(Err(e)) => {
                tracing::error!("failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "status": "error",
                        "message": "Internal server error",
                    })),
                )
                    .into_response();
            }
            None => {}
        }

        (self.status_code, Json(Value::Object(envelope))).into_response()
    }
}

/// Standard handler signature: success envelope or taxonomy error.
pub type ApiResult = Result<ApiResponse, crate::error::ApiError>;
