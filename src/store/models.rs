//! Entities held by the in-memory store, plus the derived view types the
//! API returns. Wire field names follow the public API (`user_id`,
//! `project_id`, ... as primary keys; optional fields omitted when absent).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unrecognized value")]
pub struct ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Member,
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "member" => Ok(UserRole::Member),
            _ => Err(ParseEnumError),
        }
    }
}

/// Role of a user inside one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Member,
    Viewer,
}

impl FromStr for MemberRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(MemberRole::Owner),
            "member" => Ok(MemberRole::Member),
            "viewer" => Ok(MemberRole::Viewer),
            _ => Err(ParseEnumError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(ParseEnumError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Blocked,
    Resolved,
}

impl FromStr for DependencyStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blocked" => Ok(DependencyStatus::Blocked),
            "resolved" => Ok(DependencyStatus::Resolved),
            _ => Err(ParseEnumError),
        }
    }
}

/// Endpoint kind of a tunnel edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Task,
    Project,
}

impl FromStr for SourceType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(SourceType::Task),
            "project" => Ok(SourceType::Project),
            _ => Err(ParseEnumError),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Never serialized; the hash must not leave the process.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub project_id: i64,
    pub name: String,
    pub description: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectMember {
    pub member_id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub task_id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskAssignment {
    pub assignment_id: i64,
    pub task_id: i64,
    pub user_id: i64,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskComment {
    pub comment_id: i64,
    pub task_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskDependency {
    pub dependency_id: i64,
    pub task_id: i64,
    /// Task that blocks `task_id`.
    pub blocked_by: i64,
    pub status: DependencyStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Workload {
    pub workload_id: i64,
    pub user_id: i64,
    pub project_id: i64,
    pub task_count: i64,
    pub estimated_hours: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodPulse {
    pub mood_id: i64,
    pub user_id: i64,
    pub project_id: i64,
    /// 1..=5, validated at the handler.
    pub mood_value: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tunnel {
    pub tunnel_id: i64,
    pub source_type: SourceType,
    pub source_id: i64,
    pub target_type: SourceType,
    pub target_id: i64,
    /// Placeholder similarity in [0.6, 1.0); not derived from content.
    pub similarity: f64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Derived views returned by the API

/// Member row joined with the user's display name.
#[derive(Debug, Clone, Serialize)]
pub struct MemberProfile {
    pub user_id: i64,
    pub name: String,
    pub role: MemberRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssigneeProfile {
    pub user_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: TaskComment,
    pub user_name: String,
}

/// One direction of a blocked-by edge, with the linked task's title.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyLink {
    pub dependency_id: i64,
    pub task_id: i64,
    pub title: String,
    pub status: DependencyStatus,
}

/// Both directions of the dependency list for one task. One hop only.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyView {
    pub task_id: i64,
    pub title: String,
    pub blocked_by: Vec<DependencyLink>,
    pub blocking: Vec<DependencyLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkloadView {
    #[serde(flatten)]
    pub workload: Workload,
    pub project_name: String,
}

/// Per-day mood aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct DailyMood {
    pub date: NaiveDate,
    pub average_mood: f64,
    pub mood_count: usize,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodSummary {
    pub project_id: i64,
    pub project_name: String,
    pub mood_data: Vec<DailyMood>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TunnelTarget {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TunnelView {
    #[serde(flatten)]
    pub tunnel: Tunnel,
    pub target_info: TunnelTarget,
}

/// Membership summary shown on a user profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRole {
    pub project_id: i64,
    pub name: String,
    pub role: MemberRole,
}
