//! Typed HTTP client for the SynergySphere API.
//!
//! Wraps `reqwest` with bearer-token attachment and response normalization:
//! every outcome — success, API error, non-JSON body, transport failure —
//! comes back as the same [`ApiEnvelope`] the server speaks, so callers
//! branch on `status` instead of juggling error types. No retry, no caching.

use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub token: Option<String>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            data: None,
            token: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    async fn request(&self, method: Method, endpoint: &str, body: Option<Value>) -> ApiEnvelope {
        let url = format!("{}/api/v1{}", self.base_url, endpoint);
        let mut request = self.http.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ApiEnvelope::error(format!("Network error: {e}")),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ApiEnvelope::error(format!("Network error: {e}")),
        };

        match serde_json::from_str::<ApiEnvelope>(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => ApiEnvelope::error(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("request failed"),
            )),
            Err(_) => ApiEnvelope::error("Server returned invalid response format"),
        }
    }

    // Authentication

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> ApiEnvelope {
        let mut body = json!({ "name": name, "email": email, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        self.request(Method::POST, "/auth/register", Some(body)).await
    }

    /// On success the returned token is kept and attached to later requests.
    pub async fn login(&mut self, email: &str, password: &str) -> ApiEnvelope {
        let envelope = self
            .request(
                Method::POST,
                "/auth/login",
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        if let Some(token) = &envelope.token {
            self.token = Some(token.clone());
        }
        envelope
    }

    pub async fn current_user(&self) -> ApiEnvelope {
        self.request(Method::GET, "/auth/me", None).await
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> ApiEnvelope {
        self.request(
            Method::POST,
            "/auth/change-password",
            Some(json!({
                "currentPassword": current_password,
                "newPassword": new_password,
            })),
        )
        .await
    }

    // Projects

    pub async fn get_projects(&self) -> ApiEnvelope {
        self.request(Method::GET, "/projects", None).await
    }

    pub async fn get_project(&self, project_id: i64) -> ApiEnvelope {
        self.request(Method::GET, &format!("/projects/{project_id}"), None)
            .await
    }

    pub async fn create_project(&self, name: &str, description: &str) -> ApiEnvelope {
        self.request(
            Method::POST,
            "/projects",
            Some(json!({ "name": name, "description": description })),
        )
        .await
    }

    pub async fn update_project(
        &self,
        project_id: i64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> ApiEnvelope {
        let body = optional_fields([("name", opt_str(name)), ("description", opt_str(description))]);
        self.request(Method::PATCH, &format!("/projects/{project_id}"), Some(body))
            .await
    }

    pub async fn add_project_member(
        &self,
        project_id: i64,
        user_id: i64,
        role: &str,
    ) -> ApiEnvelope {
        self.request(
            Method::POST,
            &format!("/projects/{project_id}/members"),
            Some(json!({ "user_id": user_id, "role": role })),
        )
        .await
    }

    // Tasks

    pub async fn get_project_tasks(&self, project_id: i64) -> ApiEnvelope {
        self.request(Method::GET, &format!("/projects/{project_id}/tasks"), None)
            .await
    }

    pub async fn get_task(&self, task_id: i64) -> ApiEnvelope {
        self.request(Method::GET, &format!("/tasks/{task_id}"), None)
            .await
    }

    pub async fn create_task(
        &self,
        project_id: i64,
        title: &str,
        description: &str,
        status: Option<&str>,
        due_date: Option<&str>,
    ) -> ApiEnvelope {
        let mut body = json!({
            "project_id": project_id,
            "title": title,
            "description": description,
        });
        if let Some(status) = status {
            body["status"] = json!(status);
        }
        if let Some(due_date) = due_date {
            body["due_date"] = json!(due_date);
        }
        self.request(Method::POST, "/tasks", Some(body)).await
    }

    pub async fn update_task(
        &self,
        task_id: i64,
        title: Option<&str>,
        description: Option<&str>,
        status: Option<&str>,
        due_date: Option<&str>,
    ) -> ApiEnvelope {
        let body = optional_fields([
            ("title", opt_str(title)),
            ("description", opt_str(description)),
            ("status", opt_str(status)),
            ("due_date", opt_str(due_date)),
        ]);
        self.request(Method::PATCH, &format!("/tasks/{task_id}"), Some(body))
            .await
    }

    pub async fn assign_task(&self, task_id: i64, user_id: i64) -> ApiEnvelope {
        self.request(
            Method::POST,
            &format!("/tasks/{task_id}/assignments"),
            Some(json!({ "user_id": user_id })),
        )
        .await
    }

    // Comments

    pub async fn get_task_comments(&self, task_id: i64) -> ApiEnvelope {
        self.request(Method::GET, &format!("/tasks/{task_id}/comments"), None)
            .await
    }

    pub async fn add_task_comment(&self, task_id: i64, content: &str) -> ApiEnvelope {
        self.request(
            Method::POST,
            &format!("/tasks/{task_id}/comments"),
            Some(json!({ "content": content })),
        )
        .await
    }

    pub async fn update_comment(&self, comment_id: i64, content: &str) -> ApiEnvelope {
        self.request(
            Method::PATCH,
            &format!("/comments/{comment_id}"),
            Some(json!({ "content": content })),
        )
        .await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> ApiEnvelope {
        self.request(Method::DELETE, &format!("/comments/{comment_id}"), None)
            .await
    }

    // Users

    pub async fn get_users(&self) -> ApiEnvelope {
        self.request(Method::GET, "/users", None).await
    }

    pub async fn get_user(&self, user_id: i64) -> ApiEnvelope {
        self.request(Method::GET, &format!("/users/{user_id}"), None)
            .await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        name: Option<&str>,
        email: Option<&str>,
    ) -> ApiEnvelope {
        let body = optional_fields([("name", opt_str(name)), ("email", opt_str(email))]);
        self.request(Method::PATCH, &format!("/users/{user_id}"), Some(body))
            .await
    }

    // Workload

    pub async fn get_user_workload(&self, user_id: i64) -> ApiEnvelope {
        self.request(Method::GET, &format!("/workload/users/{user_id}"), None)
            .await
    }

    pub async fn update_workload(&self, workload_id: i64, estimated_hours: f64) -> ApiEnvelope {
        self.request(
            Method::PATCH,
            &format!("/workload/{workload_id}"),
            Some(json!({ "estimated_hours": estimated_hours })),
        )
        .await
    }

    // Mood pulse

    pub async fn submit_mood_pulse(
        &self,
        project_id: i64,
        mood_value: i32,
        comment: Option<&str>,
    ) -> ApiEnvelope {
        let mut body = json!({ "project_id": project_id, "mood_value": mood_value });
        if let Some(comment) = comment {
            body["comment"] = json!(comment);
        }
        self.request(Method::POST, "/mood", Some(body)).await
    }

    pub async fn get_project_mood_pulses(&self, project_id: i64) -> ApiEnvelope {
        self.request(Method::GET, &format!("/mood/projects/{project_id}"), None)
            .await
    }

    // Dependencies

    pub async fn create_dependency(&self, task_id: i64, blocked_by: i64) -> ApiEnvelope {
        self.request(
            Method::POST,
            "/dependencies",
            Some(json!({ "task_id": task_id, "blocked_by": blocked_by })),
        )
        .await
    }

    pub async fn update_dependency(&self, dependency_id: i64, status: &str) -> ApiEnvelope {
        self.request(
            Method::PATCH,
            &format!("/dependencies/{dependency_id}"),
            Some(json!({ "status": status })),
        )
        .await
    }

    pub async fn get_task_dependencies(&self, task_id: i64) -> ApiEnvelope {
        self.request(Method::GET, &format!("/dependencies/tasks/{task_id}"), None)
            .await
    }

    pub async fn delete_dependency(&self, dependency_id: i64) -> ApiEnvelope {
        self.request(
            Method::DELETE,
            &format!("/dependencies/{dependency_id}"),
            None,
        )
        .await
    }

    // Tunnels

    pub async fn get_tunnels(&self, source_type: &str, source_id: i64) -> ApiEnvelope {
        self.request(
            Method::GET,
            &format!("/tunnels?source_type={source_type}&source_id={source_id}"),
            None,
        )
        .await
    }

    pub async fn generate_tunnels(
        &self,
        source_type: &str,
        source_id: i64,
        threshold: Option<f64>,
    ) -> ApiEnvelope {
        let mut body = json!({ "source_type": source_type, "source_id": source_id });
        if let Some(threshold) = threshold {
            body["threshold"] = json!(threshold);
        }
        self.request(Method::POST, "/tunnels/generate", Some(body))
            .await
    }
}

fn opt_str(value: Option<&str>) -> Option<Value> {
    value.map(|v| json!(v))
}

/// Build a PATCH body from present fields only, mirroring partial updates.
fn optional_fields<const N: usize>(fields: [(&str, Option<Value>); N]) -> Value {
    let mut map = Map::new();
    for (key, value) in fields {
        if let Some(value) = value {
            map.insert(key.to_string(), value);
        }
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_success_flag() {
        let envelope: ApiEnvelope =
            serde_json::from_str(r#"{"status":"success","data":{"x":1}}"#).unwrap();
        assert!(envelope.is_success());
        assert!(envelope.message.is_none());

        let envelope = ApiEnvelope::error("boom");
        assert!(!envelope.is_success());
        assert_eq!(envelope.message.as_deref(), Some("boom"));
    }

    #[test]
    fn optional_fields_skips_absent_values() {
        let body = optional_fields([("name", opt_str(Some("N"))), ("email", opt_str(None))]);
        assert_eq!(body, json!({ "name": "N" }));
    }
}
