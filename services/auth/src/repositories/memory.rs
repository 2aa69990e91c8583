//! In-memory user store
//!
//! Mirrors the constraints of the `users` table (unique username, unique
//! email when present, sequential ids). Used by tests and local runs without
//! a database.

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    models::{NewUser, User},
    repositories::UserStore,
};

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn insert(&self, new_user: NewUser) -> DatabaseResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == new_user.username) {
            return Err(DatabaseError::UniqueViolation("users_username_key".to_string()));
        }
        if let Some(email) = new_user.email.as_deref() {
            if users.iter().any(|u| u.email.as_deref() == Some(email)) {
                return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
            }
        }

        let user = User {
            id: users.len() as i64 + 1,
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            password_hash: new_user.password_hash,
            is_active: true,
            created_at: Utc::now(),
        };
        users.push(user.clone());

        Ok(user)
    }
}
