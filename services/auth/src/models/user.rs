//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity
///
/// `password_hash` is skipped when serializing and redacted from `Debug`, so
/// neither responses nor logs can carry it.
#[derive(Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password_hash", &"<redacted>")
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// What registration hands back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// New user row, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Registration payload
#[derive(Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// OAuth2 password-grant login form
#[derive(Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}
