//! Blocked-by edges between tasks.
//!
//! The dependency view is one hop in each direction; there is no transitive
//! traversal and no cycle detection.

use chrono::Utc;

use super::models::{DependencyLink, DependencyStatus, DependencyView, TaskDependency};
use super::{Store, StoreError};

impl Store {
    pub async fn create_dependency(&self, task_id: i64, blocked_by: i64) -> TaskDependency {
        let mut tables = self.tables.write().await;
        let dependency = TaskDependency {
            dependency_id: tables.dependencies.allocate_id(),
            task_id,
            blocked_by,
            status: DependencyStatus::Blocked,
            created_at: Utc::now(),
        };
        tables.dependencies.rows.push(dependency.clone());
        dependency
    }

    pub async fn update_dependency_status(
        &self,
        dependency_id: i64,
        status: DependencyStatus,
    ) -> Result<TaskDependency, StoreError> {
        let mut tables = self.tables.write().await;
        let dependency = tables
            .dependencies
            .rows
            .iter_mut()
            .find(|d| d.dependency_id == dependency_id)
            .ok_or_else(|| StoreError::not_found("Dependency not found"))?;
        dependency.status = status;
        Ok(dependency.clone())
    }

    /// Tasks blocking `task_id` and tasks it blocks, with titles attached.
    /// Returns `None` when the task itself does not exist.
    pub async fn dependency_view(&self, task_id: i64) -> Option<DependencyView> {
        let tables = self.tables.read().await;
        let task = tables.tasks.rows.iter().find(|t| t.task_id == task_id)?;

        let blocked_by = tables
            .dependencies
            .rows
            .iter()
            .filter(|d| d.task_id == task_id)
            .map(|d| DependencyLink {
                dependency_id: d.dependency_id,
                task_id: d.blocked_by,
                title: tables.task_title(d.blocked_by),
                status: d.status,
            })
            .collect();

        let blocking = tables
            .dependencies
            .rows
            .iter()
            .filter(|d| d.blocked_by == task_id)
            .map(|d| DependencyLink {
                dependency_id: d.dependency_id,
                task_id: d.task_id,
                title: tables.task_title(d.task_id),
                status: d.status,
            })
            .collect();

        Some(DependencyView {
            task_id,
            title: task.title.clone(),
            blocked_by,
            blocking,
        })
    }

    pub async fn delete_dependency(&self, dependency_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .dependencies
            .rows
            .iter()
            .position(|d| d.dependency_id == dependency_id)
            .ok_or_else(|| StoreError::not_found("Dependency not found"))?;
        tables.dependencies.rows.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{TaskStatus, UserRole};

    async fn task(store: &Store, project: i64, user: i64, title: &str) -> i64 {
        store
            .create_task(
                project,
                title.into(),
                "d".into(),
                TaskStatus::Todo,
                None,
                user,
            )
            .await
            .task_id
    }

    #[tokio::test]
    async fn view_lists_both_directions() {
        let store = Store::new();
        let user = store
            .create_user("A".into(), "a@x.com".into(), "h".into(), UserRole::Member)
            .await
            .unwrap()
            .user_id;
        let project = store
            .create_project("P".into(), "d".into(), user)
            .await
            .project_id;
        let design = task(&store, project, user, "Design").await;
        let build = task(&store, project, user, "Build").await;
        let ship = task(&store, project, user, "Ship").await;

        // build blocked by design; ship blocked by build
        store.create_dependency(build, design).await;
        store.create_dependency(ship, build).await;

        let view = store.dependency_view(build).await.expect("view");
        assert_eq!(view.title, "Build");
        assert_eq!(view.blocked_by.len(), 1);
        assert_eq!(view.blocked_by[0].title, "Design");
        assert_eq!(view.blocking.len(), 1);
        assert_eq!(view.blocking[0].title, "Ship");
    }

    #[tokio::test]
    async fn missing_task_yields_no_view() {
        let store = Store::new();
        assert!(store.dependency_view(42).await.is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent_failure() {
        let store = Store::new();
        let user = store
            .create_user("A".into(), "a@x.com".into(), "h".into(), UserRole::Member)
            .await
            .unwrap()
            .user_id;
        let project = store
            .create_project("P".into(), "d".into(), user)
            .await
            .project_id;
        let a = task(&store, project, user, "A").await;
        let b = task(&store, project, user, "B").await;
        let dep = store.create_dependency(a, b).await;

        store
            .delete_dependency(dep.dependency_id)
            .await
            .expect("first delete");
        let err = store
            .delete_dependency(dep.dependency_id)
            .await
            .expect_err("second delete");
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
