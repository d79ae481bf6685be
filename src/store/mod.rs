//! In-memory resource store.
//!
//! One [`Store`] instance is shared by all handlers through axum state; it
//! replaces the global mutable tables of a database-backed deployment while
//! keeping the same CRUD contract per entity. All tables sit behind a single
//! `RwLock`, so multi-step mutations (project + owner membership, assignment
//! + workload refresh) are applied under one write guard.

pub mod models;

mod dependencies;
mod mood;
mod projects;
mod tasks;
mod tunnels;
mod users;
mod workload;

use thiserror::Error;
use tokio::sync::RwLock;

use self::models::{
    MoodPulse, Project, ProjectMember, Task, TaskAssignment, TaskComment, TaskDependency, Tunnel,
    User, Workload,
};

pub use self::tasks::TaskUpdate;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
}

impl StoreError {
    fn not_found(message: impl Into<String>) -> Self {
        StoreError::NotFound(message.into())
    }

    fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict(message.into())
    }
}

/// One entity table: rows plus a monotonic id counter.
///
/// Ids are never reused, so deleting a row cannot make a later insert
/// collide with a live one.
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    projects: Table<Project>,
    project_members: Table<ProjectMember>,
    tasks: Table<Task>,
    assignments: Table<TaskAssignment>,
    comments: Table<TaskComment>,
    dependencies: Table<TaskDependency>,
    workloads: Table<Workload>,
    mood_pulses: Table<MoodPulse>,
    tunnels: Table<Tunnel>,
}

impl Tables {
    fn user_name(&self, user_id: i64) -> String {
        self.users
            .rows
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| "Unknown User".to_string())
    }

    fn task_title(&self, task_id: i64) -> String {
        self.tasks
            .rows
            .iter()
            .find(|t| t.task_id == task_id)
            .map(|t| t.title.clone())
            .unwrap_or_else(|| "Unknown Task".to_string())
    }

    fn project_name(&self, project_id: i64) -> String {
        self.projects
            .rows
            .iter()
            .find(|p| p.project_id == project_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Unknown Project".to_string())
    }
}

#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}
