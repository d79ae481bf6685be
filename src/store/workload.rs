//! Per-user, per-project workload aggregates.

use chrono::Utc;

use super::models::{Workload, WorkloadView};
use super::{Store, StoreError, Tables};

/// Default estimate for a newly tracked task.
const DEFAULT_HOURS_PER_TASK: f64 = 5.0;

impl Tables {
    /// Recompute the workload row for (user, project) from live assignments,
    /// creating it if missing. Manually edited hour estimates survive.
    pub(super) fn refresh_workload_row(&mut self, user_id: i64, project_id: i64) {
        let task_ids: Vec<i64> = self
            .assignments
            .rows
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.task_id)
            .collect();
        let task_count = self
            .tasks
            .rows
            .iter()
            .filter(|t| t.project_id == project_id && task_ids.contains(&t.task_id))
            .count() as i64;

        if let Some(workload) = self
            .workloads
            .rows
            .iter_mut()
            .find(|w| w.user_id == user_id && w.project_id == project_id)
        {
            workload.task_count = task_count;
            workload.updated_at = Utc::now();
            return;
        }

        let workload = Workload {
            workload_id: self.workloads.allocate_id(),
            user_id,
            project_id,
            task_count,
            estimated_hours: task_count as f64 * DEFAULT_HOURS_PER_TASK,
            updated_at: Utc::now(),
        };
        self.workloads.rows.push(workload);
    }
}

impl Store {
    /// Workload rows for a user, joined with project names.
    pub async fn user_workloads(&self, user_id: i64) -> Vec<WorkloadView> {
        let tables = self.tables.read().await;
        tables
            .workloads
            .rows
            .iter()
            .filter(|w| w.user_id == user_id)
            .map(|w| WorkloadView {
                workload: w.clone(),
                project_name: tables.project_name(w.project_id),
            })
            .collect()
    }

    pub async fn update_workload_hours(
        &self,
        workload_id: i64,
        estimated_hours: f64,
    ) -> Result<Workload, StoreError> {
        let mut tables = self.tables.write().await;
        let workload = tables
            .workloads
            .rows
            .iter_mut()
            .find(|w| w.workload_id == workload_id)
            .ok_or_else(|| StoreError::not_found("Workload not found"))?;
        workload.estimated_hours = estimated_hours;
        workload.updated_at = Utc::now();
        Ok(workload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{TaskStatus, UserRole};

    #[tokio::test]
    async fn manual_hours_survive_refresh() {
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
        let first = store
            .create_task(project, "T1".into(), "d".into(), TaskStatus::Todo, None, user)
            .await;
        let second = store
            .create_task(project, "T2".into(), "d".into(), TaskStatus::Todo, None, user)
            .await;

        store.assign_task(first.task_id, user).await.unwrap();
        let workload_id = store.user_workloads(user).await[0].workload.workload_id;
        store
            .update_workload_hours(workload_id, 12.5)
            .await
            .expect("update hours");

        store.assign_task(second.task_id, user).await.unwrap();
        let views = store.user_workloads(user).await;
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].workload.task_count, 2);
        assert_eq!(views[0].workload.estimated_hours, 12.5);
        assert_eq!(views[0].project_name, "P");
    }

    #[tokio::test]
    async fn unknown_workload_is_not_found() {
        let store = Store::new();
        let err = store
            .update_workload_hours(99, 1.0)
            .await
            .expect_err("missing row");
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
