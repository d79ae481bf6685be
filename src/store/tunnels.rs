//! Tunnels: stored similarity edges between tasks/projects.
//!
//! Generation is an acknowledged placeholder: scores are drawn uniformly
//! from [0.6, 1.0) rather than computed from content, pending a real
//! similarity measure.

use chrono::Utc;
use rand::Rng;

use super::models::{SourceType, Tunnel, TunnelTarget, TunnelView};
use super::Store;

impl Store {
    /// Tunnels leaving a source, with target titles resolved.
    pub async fn tunnels_for_source(
        &self,
        source_type: SourceType,
        source_id: i64,
    ) -> Vec<TunnelView> {
        let tables = self.tables.read().await;
        tables
            .tunnels
            .rows
            .iter()
            .filter(|t| t.source_type == source_type && t.source_id == source_id)
            .map(|t| {
                let target_info = match t.target_type {
                    SourceType::Task => TunnelTarget {
                        title: tables.task_title(t.target_id),
                        project_id: tables
                            .tasks
                            .rows
                            .iter()
                            .find(|task| task.task_id == t.target_id)
                            .map(|task| task.project_id),
                    },
                    SourceType::Project => TunnelTarget {
                        title: tables.project_name(t.target_id),
                        project_id: None,
                    },
                };
                TunnelView {
                    tunnel: t.clone(),
                    target_info,
                }
            })
            .collect()
    }

    /// Score every other task against a task source and persist the edges
    /// that clear the threshold. Project sources generate nothing.
    pub async fn generate_tunnels(
        &self,
        source_type: SourceType,
        source_id: i64,
        threshold: f64,
    ) -> Vec<Tunnel> {
        if source_type != SourceType::Task {
            return Vec::new();
        }

        let mut tables = self.tables.write().await;
        if !tables.tasks.rows.iter().any(|t| t.task_id == source_id) {
            return Vec::new();
        }

        let candidate_ids: Vec<i64> = tables
            .tasks
            .rows
            .iter()
            .filter(|t| t.task_id != source_id)
            .map(|t| t.task_id)
            .collect();

        let mut rng = rand::thread_rng();
        let mut generated = Vec::new();
        for target_id in candidate_ids {
            let similarity = rng.gen_range(0.6..1.0);
            if similarity >= threshold {
                let tunnel = Tunnel {
                    tunnel_id: tables.tunnels.allocate_id(),
                    source_type: SourceType::Task,
                    source_id,
                    target_type: SourceType::Task,
                    target_id,
                    similarity,
                    created_at: Utc::now(),
                };
                tables.tunnels.rows.push(tunnel.clone());
                generated.push(tunnel);
            }
        }
        generated
    }
}
