//! Router assembly.
//!
//! Public routes (registration, login, banner, health) merge with the
//! protected API, which sits behind the bearer-token middleware. The store
//! is injected as shared state so tests can run the whole app in-process
//! against a fresh store.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::middleware::{require_auth, ApiResponse};
use crate::store::Store;

pub fn app(store: Arc<Store>) -> Router {
    let protected = Router::new()
        .merge(auth_routes())
        .merge(project_routes())
        .merge(task_routes())
        .merge(comment_routes())
        .merge(dependency_routes())
        .merge(workload_routes())
        .merge(mood_routes())
        .merge(tunnel_routes())
        .merge(user_routes())
        .layer(middleware::from_fn(require_auth));

    Router::new()
        // Public
        .route("/api/v1", get(root))
        .route("/health", get(health))
        .merge(public_auth_routes())
        // Protected API
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

fn public_auth_routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
}

fn auth_routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/v1/auth/me", get(handlers::auth::me))
        .route(
            "/api/v1/auth/change-password",
            post(handlers::auth::change_password),
        )
}

fn project_routes() -> Router<Arc<Store>> {
    Router::new()
        .route(
            "/api/v1/projects",
            get(handlers::projects::list).post(handlers::projects::create),
        )
        .route(
            "/api/v1/projects/:id",
            get(handlers::projects::show).patch(handlers::projects::update),
        )
        .route(
            "/api/v1/projects/:id/members",
            post(handlers::projects::add_member),
        )
        .route("/api/v1/projects/:id/tasks", get(handlers::projects::tasks))
}

fn task_routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/v1/tasks", post(handlers::tasks::create))
        .route(
            "/api/v1/tasks/:id",
            get(handlers::tasks::show).patch(handlers::tasks::update),
        )
        .route(
            "/api/v1/tasks/:id/assignments",
            post(handlers::tasks::assign),
        )
}

fn comment_routes() -> Router<Arc<Store>> {
    Router::new()
        .route(
            "/api/v1/tasks/:id/comments",
            get(handlers::comments::list).post(handlers::comments::create),
        )
        .route(
            "/api/v1/comments/:id",
            patch(handlers::comments::update).delete(handlers::comments::delete),
        )
}

fn dependency_routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/v1/dependencies", post(handlers::dependencies::create))
        .route(
            "/api/v1/dependencies/:id",
            patch(handlers::dependencies::update).delete(handlers::dependencies::delete),
        )
        .route(
            "/api/v1/dependencies/tasks/:id",
            get(handlers::dependencies::for_task),
        )
}

fn workload_routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/v1/workload/:id", patch(handlers::workload::update))
        .route(
            "/api/v1/workload/users/:id",
            get(handlers::workload::for_user),
        )
}

fn mood_routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/v1/mood", post(handlers::mood::submit))
        .route(
            "/api/v1/mood/projects/:id",
            get(handlers::mood::for_project),
        )
}

fn tunnel_routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/v1/tunnels", get(handlers::tunnels::list))
        .route(
            "/api/v1/tunnels/generate",
            post(handlers::tunnels::generate),
        )
}

fn user_routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/v1/users", get(handlers::users::list))
        .route(
            "/api/v1/users/:id",
            get(handlers::users::show).patch(handlers::users::update),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "message": "Welcome to SynergySphere API",
        "version": version,
        "endpoints": {
            "auth": "/api/v1/auth/* (register and login are public)",
            "projects": "/api/v1/projects[/:id] (protected)",
            "tasks": "/api/v1/tasks[/:id] (protected)",
            "dependencies": "/api/v1/dependencies (protected)",
            "workload": "/api/v1/workload (protected)",
            "mood": "/api/v1/mood (protected)",
            "tunnels": "/api/v1/tunnels (protected)",
            "users": "/api/v1/users (protected)",
        },
    }))
}

async fn health() -> ApiResponse {
    ApiResponse::ok().data(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
