//! Tasks, assignments and comments.

use chrono::{NaiveDate, Utc};

use super::models::{
    AssigneeProfile, CommentView, Task, TaskAssignment, TaskComment, TaskStatus,
};
use super::{Store, StoreError};

/// Field updates applied by `PATCH /tasks/:id`. `None` leaves a field alone.
#[derive(Debug, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
}

impl Store {
    pub async fn create_task(
        &self,
        project_id: i64,
        title: String,
        description: String,
        status: TaskStatus,
        due_date: Option<NaiveDate>,
        created_by: i64,
    ) -> Task {
        let mut tables = self.tables.write().await;
        let task = Task {
            task_id: tables.tasks.allocate_id(),
            project_id,
            title,
            description,
            status,
            due_date,
            created_by,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.tasks.rows.push(task.clone());
        task
    }

    pub async fn task_by_id(&self, task_id: i64) -> Option<Task> {
        let tables = self.tables.read().await;
        tables
            .tasks
            .rows
            .iter()
            .find(|t| t.task_id == task_id)
            .cloned()
    }

    pub async fn tasks_by_project(&self, project_id: i64) -> Vec<Task> {
        let tables = self.tables.read().await;
        tables
            .tasks
            .rows
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect()
    }

    pub async fn update_task(
        &self,
        task_id: i64,
        updates: TaskUpdate,
    ) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;
        let task = tables
            .tasks
            .rows
            .iter_mut()
            .find(|t| t.task_id == task_id)
            .ok_or_else(|| StoreError::not_found("Task not found"))?;

        if let Some(title) = updates.title {
            task.title = title;
        }
        if let Some(description) = updates.description {
            task.description = description;
        }
        if let Some(status) = updates.status {
            task.status = status;
        }
        if let Some(due_date) = updates.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = Some(Utc::now());
        Ok(task.clone())
    }

    /// Assignment rows joined with user display names.
    pub async fn task_assignee_profiles(&self, task_id: i64) -> Vec<AssigneeProfile> {
        let tables = self.tables.read().await;
        tables
            .assignments
            .rows
            .iter()
            .filter(|a| a.task_id == task_id)
            .map(|a| AssigneeProfile {
                user_id: a.user_id,
                name: tables.user_name(a.user_id),
            })
            .collect()
    }

    /// Assign a task and refresh the assignee's workload row for the task's
    /// project under the same write guard. Re-assigning conflicts.
    pub async fn assign_task(
        &self,
        task_id: i64,
        user_id: i64,
    ) -> Result<TaskAssignment, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .assignments
            .rows
            .iter()
            .any(|a| a.task_id == task_id && a.user_id == user_id)
        {
            return Err(StoreError::conflict(
                "User is already assigned to this task",
            ));
        }

        let assignment = TaskAssignment {
            assignment_id: tables.assignments.allocate_id(),
            task_id,
            user_id,
            assigned_at: Utc::now(),
        };
        tables.assignments.rows.push(assignment.clone());

        let project_id = tables
            .tasks
            .rows
            .iter()
            .find(|t| t.task_id == task_id)
            .map(|t| t.project_id);
        if let Some(project_id) = project_id {
            tables.refresh_workload_row(user_id, project_id);
        }

        Ok(assignment)
    }

    pub async fn comments_for_task(&self, task_id: i64) -> Vec<CommentView> {
        let tables = self.tables.read().await;
        tables
            .comments
            .rows
            .iter()
            .filter(|c| c.task_id == task_id)
            .map(|c| CommentView {
                comment: c.clone(),
                user_name: tables.user_name(c.user_id),
            })
            .collect()
    }

    pub async fn add_comment(&self, task_id: i64, user_id: i64, content: String) -> TaskComment {
        let mut tables = self.tables.write().await;
        let comment = TaskComment {
            comment_id: tables.comments.allocate_id(),
            task_id,
            user_id,
            content,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.comments.rows.push(comment.clone());
        comment
    }

    pub async fn update_comment(
        &self,
        comment_id: i64,
        content: String,
    ) -> Result<TaskComment, StoreError> {
        let mut tables = self.tables.write().await;
        let comment = tables
            .comments
            .rows
            .iter_mut()
            .find(|c| c.comment_id == comment_id)
            .ok_or_else(|| StoreError::not_found("Comment not found"))?;
        comment.content = content;
        comment.updated_at = Some(Utc::now());
        Ok(comment.clone())
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .comments
            .rows
            .iter()
            .position(|c| c.comment_id == comment_id)
            .ok_or_else(|| StoreError::not_found("Comment not found"))?;
        tables.comments.rows.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::UserRole;

    async fn seed(store: &Store) -> (i64, i64, i64) {
        let user = store
            .create_user("A".into(), "a@x.com".into(), "h".into(), UserRole::Member)
            .await
            .unwrap()
            .user_id;
        let project = store
            .create_project("P".into(), "d".into(), user)
            .await
            .project_id;
        let task = store
            .create_task(
                project,
                "T".into(),
                "d".into(),
                TaskStatus::Todo,
                None,
                user,
            )
            .await
            .task_id;
        (user, project, task)
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_comment() {
        let store = Store::new();
        let (user, _, task) = seed(&store).await;
        let first = store.add_comment(task, user, "one".into()).await;
        store.add_comment(task, user, "two".into()).await;

        store.delete_comment(first.comment_id).await.expect("delete");
        let remaining = store.comments_for_task(task).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].comment.content, "two");

        let err = store
            .delete_comment(first.comment_id)
            .await
            .expect_err("already gone");
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.comments_for_task(task).await.len(), 1);
    }

    #[tokio::test]
    async fn assignment_refreshes_workload() {
        let store = Store::new();
        let (user, project, task) = seed(&store).await;
        store.assign_task(task, user).await.expect("assign");

        let workloads = store.user_workloads(user).await;
        assert_eq!(workloads.len(), 1);
        assert_eq!(workloads[0].workload.project_id, project);
        assert_eq!(workloads[0].workload.task_count, 1);
        assert_eq!(workloads[0].workload.estimated_hours, 5.0);
    }

    #[tokio::test]
    async fn duplicate_assignment_conflicts() {
        let store = Store::new();
        let (user, _, task) = seed(&store).await;
        store.assign_task(task, user).await.expect("first");
        let err = store.assign_task(task, user).await.expect_err("second");
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
