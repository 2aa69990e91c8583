//! User repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::debug;

use crate::models::{NewUser, User};

/// Lookup and insertion of user records.
///
/// The credential service only reads through this trait; connection handling
/// and transactions belong to the implementation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive username match
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Insert a new user. Duplicate usernames or emails fail with a unique
    /// violation (see [`DatabaseError::is_unique_violation`]).
    async fn insert(&self, new_user: NewUser) -> DatabaseResult<User>;
}

/// PostgreSQL user repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        debug!("Finding user by username: {}", username);

        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, is_active, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn insert(&self, new_user: NewUser) -> DatabaseResult<User> {
        debug!("Inserting user: {}", new_user.username);

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, first_name, last_name, password_hash, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING id, username, email, first_name, last_name, password_hash, is_active, created_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }
}
