//! Projects and project memberships.

use chrono::Utc;

use super::models::{MemberProfile, MemberRole, Project, ProjectMember, ProjectRole};
use super::{Store, StoreError};

impl Store {
    /// Create a project and enroll the creator as its `owner`, atomically.
    pub async fn create_project(
        &self,
        name: String,
        description: String,
        created_by: i64,
    ) -> Project {
        let mut tables = self.tables.write().await;
        let project = Project {
            project_id: tables.projects.allocate_id(),
            name,
            description,
            created_by,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.projects.rows.push(project.clone());

        let member = ProjectMember {
            member_id: tables.project_members.allocate_id(),
            project_id: project.project_id,
            user_id: created_by,
            role: MemberRole::Owner,
            joined_at: Utc::now(),
        };
        tables.project_members.rows.push(member);

        project
    }

    pub async fn project_by_id(&self, project_id: i64) -> Option<Project> {
        let tables = self.tables.read().await;
        tables
            .projects
            .rows
            .iter()
            .find(|p| p.project_id == project_id)
            .cloned()
    }

    /// All projects the user belongs to, in creation order.
    pub async fn user_projects(&self, user_id: i64) -> Vec<Project> {
        let tables = self.tables.read().await;
        let project_ids: Vec<i64> = tables
            .project_members
            .rows
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.project_id)
            .collect();

        tables
            .projects
            .rows
            .iter()
            .filter(|p| project_ids.contains(&p.project_id))
            .cloned()
            .collect()
    }

    pub async fn update_project(
        &self,
        project_id: i64,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Project, StoreError> {
        let mut tables = self.tables.write().await;
        let project = tables
            .projects
            .rows
            .iter_mut()
            .find(|p| p.project_id == project_id)
            .ok_or_else(|| StoreError::not_found("Project not found"))?;

        if let Some(name) = name {
            project.name = name;
        }
        if let Some(description) = description {
            project.description = description;
        }
        project.updated_at = Some(Utc::now());
        Ok(project.clone())
    }

    /// Membership rows joined with user display names.
    pub async fn project_member_profiles(&self, project_id: i64) -> Vec<MemberProfile> {
        let tables = self.tables.read().await;
        tables
            .project_members
            .rows
            .iter()
            .filter(|m| m.project_id == project_id)
            .map(|m| MemberProfile {
                user_id: m.user_id,
                name: tables.user_name(m.user_id),
                role: m.role,
            })
            .collect()
    }

    /// Add a member. The (project, user) pair is unique; re-adding conflicts.
    pub async fn add_project_member(
        &self,
        project_id: i64,
        user_id: i64,
        role: MemberRole,
    ) -> Result<ProjectMember, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .project_members
            .rows
            .iter()
            .any(|m| m.project_id == project_id && m.user_id == user_id)
        {
            return Err(StoreError::conflict(
                "User is already a member of this project",
            ));
        }

        let member = ProjectMember {
            member_id: tables.project_members.allocate_id(),
            project_id,
            user_id,
            role,
            joined_at: Utc::now(),
        };
        tables.project_members.rows.push(member.clone());
        Ok(member)
    }

    pub async fn is_project_member(&self, project_id: i64, user_id: i64) -> bool {
        let tables = self.tables.read().await;
        tables
            .project_members
            .rows
            .iter()
            .any(|m| m.project_id == project_id && m.user_id == user_id)
    }

    pub async fn project_member_role(&self, project_id: i64, user_id: i64) -> Option<MemberRole> {
        let tables = self.tables.read().await;
        tables
            .project_members
            .rows
            .iter()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .map(|m| m.role)
    }

    /// Project + membership-role summaries for a user profile.
    pub async fn user_project_roles(&self, user_id: i64) -> Vec<ProjectRole> {
        let tables = self.tables.read().await;
        tables
            .project_members
            .rows
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| ProjectRole {
                project_id: m.project_id,
                name: tables.project_name(m.project_id),
                role: m.role,
            })
            .collect()
    }
}
