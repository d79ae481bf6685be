//! Credential store: user records and lookups. Password hashes never leave
//! this module in serialized form (`User.password_hash` is skip-serialized).

use chrono::Utc;

use super::models::{User, UserRole};
use super::{Store, StoreError};

impl Store {
    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let tables = self.tables.read().await;
        tables.users.rows.iter().find(|u| u.email == email).cloned()
    }

    pub async fn find_user_by_id(&self, user_id: i64) -> Option<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .rows
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned()
    }

    /// Create a user. Email uniqueness is enforced here, not just in the
    /// registration handler.
    pub async fn create_user(
        &self,
        name: String,
        email: String,
        password_hash: String,
        role: UserRole,
    ) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.rows.iter().any(|u| u.email == email) {
            return Err(StoreError::conflict("User with this email already exists"));
        }

        let user = User {
            user_id: tables.users.allocate_id(),
            name,
            email,
            role,
            password_hash,
            created_at: Utc::now(),
        };
        tables.users.rows.push(user.clone());
        Ok(user)
    }

    pub async fn list_users(&self) -> Vec<User> {
        let tables = self.tables.read().await;
        tables.users.rows.clone()
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if let Some(new_email) = &email {
            if tables
                .users
                .rows
                .iter()
                .any(|u| u.user_id != user_id && u.email == *new_email)
            {
                return Err(StoreError::conflict("User with this email already exists"));
            }
        }

        let user = tables
            .users
            .rows
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| StoreError::not_found("User not found"))?;

        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        Ok(user.clone())
    }

    pub async fn set_password(&self, user_id: i64, password_hash: String) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .rows
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| StoreError::not_found("User not found"))?;
        user.password_hash = password_hash;
        Ok(())
    }
}
