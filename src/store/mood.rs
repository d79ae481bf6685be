//! Mood pulses and the per-day aggregation behind the team-health view.

use chrono::Utc;
use std::collections::BTreeMap;

use super::models::{DailyMood, MoodPulse, MoodSummary};
use super::Store;

impl Store {
    pub async fn submit_mood_pulse(
        &self,
        user_id: i64,
        project_id: i64,
        mood_value: i32,
        comment: Option<String>,
    ) -> MoodPulse {
        let mut tables = self.tables.write().await;
        let pulse = MoodPulse {
            mood_id: tables.mood_pulses.allocate_id(),
            user_id,
            project_id,
            mood_value,
            comment,
            created_at: Utc::now(),
        };
        tables.mood_pulses.rows.push(pulse.clone());
        pulse
    }

    /// Group a project's pulses by calendar day: per-day mean mood, count,
    /// and collected comments, days ascending.
    pub async fn project_mood_summary(&self, project_id: i64) -> MoodSummary {
        let tables = self.tables.read().await;

        let mut days: BTreeMap<chrono::NaiveDate, (Vec<i32>, Vec<String>)> = BTreeMap::new();
        for pulse in tables
            .mood_pulses
            .rows
            .iter()
            .filter(|p| p.project_id == project_id)
        {
            let entry = days.entry(pulse.created_at.date_naive()).or_default();
            entry.0.push(pulse.mood_value);
            if let Some(comment) = &pulse.comment {
                entry.1.push(comment.clone());
            }
        }

        let mood_data = days
            .into_iter()
            .map(|(date, (moods, comments))| DailyMood {
                date,
                average_mood: moods.iter().sum::<i32>() as f64 / moods.len() as f64,
                mood_count: moods.len(),
                comments,
            })
            .collect();

        MoodSummary {
            project_id,
            project_name: tables.project_name(project_id),
            mood_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::UserRole;

    #[tokio::test]
    async fn same_day_pulses_average_into_one_bucket() {
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

        store
            .submit_mood_pulse(user, project, 4, Some("steady".into()))
            .await;
        store.submit_mood_pulse(user, project, 5, None).await;

        let summary = store.project_mood_summary(project).await;
        assert_eq!(summary.project_name, "P");
        assert_eq!(summary.mood_data.len(), 1);
        let day = &summary.mood_data[0];
        assert_eq!(day.average_mood, 4.5);
        assert_eq!(day.mood_count, 2);
        assert_eq!(day.comments, vec!["steady".to_string()]);
    }

    #[tokio::test]
    async fn empty_project_has_no_buckets() {
        let store = Store::new();
        let summary = store.project_mood_summary(9).await;
        assert!(summary.mood_data.is_empty());
        assert_eq!(summary.project_name, "Unknown Project");
    }
}
