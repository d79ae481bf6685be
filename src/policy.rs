//! Shared authorization guards.
//!
//! Every project-scoped or identity-scoped check the handlers need lives
//! here, parameterized by the authenticated principal and the resource,
//! instead of being re-implemented per endpoint.

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::store::models::MemberRole;
use crate::store::Store;

/// Project-scoped reads and writes require membership.
pub async fn require_member(
    store: &Store,
    project_id: i64,
    user: &AuthUser,
) -> Result<(), ApiError> {
    if store.is_project_member(project_id, user.user_id).await {
        Ok(())
    } else {
        Err(ApiError::forbidden("Access denied"))
    }
}

/// Project mutation (update, member management) requires the project `owner`
/// role or the global `admin` role.
pub async fn require_project_admin(
    store: &Store,
    project_id: i64,
    user: &AuthUser,
) -> Result<(), ApiError> {
    let role = store.project_member_role(project_id, user.user_id).await;
    if role == Some(MemberRole::Owner) || user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Insufficient permissions"))
    }
}

/// Profile and workload access: the user themselves, or a global admin.
pub fn require_self_or_admin(user: &AuthUser, target_user_id: i64) -> Result<(), ApiError> {
    if user.user_id == target_user_id || user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Insufficient permissions"))
    }
}

pub fn require_admin(user: &AuthUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Insufficient permissions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::UserRole;

    fn principal(user_id: i64, role: UserRole) -> AuthUser {
        AuthUser {
            user_id,
            email: format!("u{user_id}@x.com"),
            role,
        }
    }

    #[test]
    fn self_or_admin_gate() {
        let member = principal(1, UserRole::Member);
        assert!(require_self_or_admin(&member, 1).is_ok());
        assert!(require_self_or_admin(&member, 2).is_err());

        let admin = principal(3, UserRole::Admin);
        assert!(require_self_or_admin(&admin, 2).is_ok());
    }

    #[tokio::test]
    async fn project_admin_gate() {
        let store = Store::new();
        let owner = store
            .create_user("O".into(), "o@x.com".into(), "h".into(), UserRole::Member)
            .await
            .unwrap();
        let outsider = store
            .create_user("X".into(), "x@x.com".into(), "h".into(), UserRole::Member)
            .await
            .unwrap();
        let project = store
            .create_project("P".into(), "d".into(), owner.user_id)
            .await;

        let owner_principal = principal(owner.user_id, UserRole::Member);
        let outsider_principal = principal(outsider.user_id, UserRole::Member);
        let admin_principal = principal(99, UserRole::Admin);

        assert!(require_project_admin(&store, project.project_id, &owner_principal)
            .await
            .is_ok());
        assert!(require_project_admin(&store, project.project_id, &outsider_principal)
            .await
            .is_err());
        // Global admins pass without membership
        assert!(require_project_admin(&store, project.project_id, &admin_principal)
            .await
            .is_ok());
        assert!(require_member(&store, project.project_id, &admin_principal)
            .await
            .is_err());
    }
}
