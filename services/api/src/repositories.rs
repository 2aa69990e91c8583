//! Repositories for database operations
//!
//! Every query is scoped by owner: a todo that belongs to somebody else is
//! indistinguishable from one that does not exist.

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;

use crate::models::{Todo, TodoRequest};

pub mod memory;

/// Storage for todo items
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list_for_owner(&self, owner_id: i64) -> DatabaseResult<Vec<Todo>>;

    async fn find_for_owner(&self, owner_id: i64, todo_id: i64) -> DatabaseResult<Option<Todo>>;

    async fn create(&self, owner_id: i64, request: &TodoRequest) -> DatabaseResult<Todo>;

    /// `None` when the todo does not exist for this owner
    async fn update_for_owner(
        &self,
        owner_id: i64,
        todo_id: i64,
        request: &TodoRequest,
    ) -> DatabaseResult<Option<Todo>>;

    /// Whether a row was deleted
    async fn delete_for_owner(&self, owner_id: i64, todo_id: i64) -> DatabaseResult<bool>;
}

/// PostgreSQL todo repository
#[derive(Clone)]
pub struct TodoRepository {
    pool: PgPool,
}

impl TodoRepository {
    /// Create a new todo repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for TodoRepository {
    async fn list_for_owner(&self, owner_id: i64) -> DatabaseResult<Vec<Todo>> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, priority, complete, owner_id
            FROM todos
            WHERE owner_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn find_for_owner(&self, owner_id: i64, todo_id: i64) -> DatabaseResult<Option<Todo>> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, priority, complete, owner_id
            FROM todos
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(todo_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn create(&self, owner_id: i64, request: &TodoRequest) -> DatabaseResult<Todo> {
        sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (title, description, priority, complete, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, priority, complete, owner_id
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.priority)
        .bind(request.complete)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn update_for_owner(
        &self,
        owner_id: i64,
        todo_id: i64,
        request: &TodoRequest,
    ) -> DatabaseResult<Option<Todo>> {
        sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title = $1, description = $2, priority = $3, complete = $4
            WHERE id = $5 AND owner_id = $6
            RETURNING id, title, description, priority, complete, owner_id
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.priority)
        .bind(request.complete)
        .bind(todo_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn delete_for_owner(&self, owner_id: i64, todo_id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(todo_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::query)?;

        Ok(result.rows_affected() > 0)
    }
}
