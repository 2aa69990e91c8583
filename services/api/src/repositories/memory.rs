//! In-memory todo store

use async_trait::async_trait;
use common::error::DatabaseResult;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;

use crate::{
    models::{Todo, TodoRequest},
    repositories::TodoStore,
};

#[derive(Default)]
struct Inner {
    next_id: i64,
    todos: BTreeMap<i64, Todo>,
}

#[derive(Clone, Default)]
pub struct InMemoryTodoStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn list_for_owner(&self, owner_id: i64) -> DatabaseResult<Vec<Todo>> {
        let inner = self.inner.read().await;
        Ok(inner
            .todos
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_for_owner(&self, owner_id: i64, todo_id: i64) -> DatabaseResult<Option<Todo>> {
        let inner = self.inner.read().await;
        Ok(inner
            .todos
            .get(&todo_id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn create(&self, owner_id: i64, request: &TodoRequest) -> DatabaseResult<Todo> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let todo = Todo {
            id: inner.next_id,
            title: request.title.clone(),
            description: request.description.clone(),
            priority: request.priority,
            complete: request.complete,
            owner_id,
        };
        inner.todos.insert(todo.id, todo.clone());

        Ok(todo)
    }

    async fn update_for_owner(
        &self,
        owner_id: i64,
        todo_id: i64,
        request: &TodoRequest,
    ) -> DatabaseResult<Option<Todo>> {
        let mut inner = self.inner.write().await;
        let Some(todo) = inner
            .todos
            .get_mut(&todo_id)
            .filter(|t| t.owner_id == owner_id)
        else {
            return Ok(None);
        };

        todo.title = request.title.clone();
        todo.description = request.description.clone();
        todo.priority = request.priority;
        todo.complete = request.complete;

        Ok(Some(todo.clone()))
    }

    async fn delete_for_owner(&self, owner_id: i64, todo_id: i64) -> DatabaseResult<bool> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .todos
            .get(&todo_id)
            .is_some_and(|t| t.owner_id == owner_id);

        if owned {
            inner.todos.remove(&todo_id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str) -> TodoRequest {
        TodoRequest {
            title: title.to_string(),
            description: Some("details".to_string()),
            priority: 3,
            complete: false,
        }
    }

    #[tokio::test]
    async fn test_todos_are_scoped_to_owner() {
        let store = InMemoryTodoStore::new();
        let mine = store.create(1, &request("mine")).await.unwrap();
        let theirs = store.create(2, &request("theirs")).await.unwrap();

        assert_eq!(store.list_for_owner(1).await.unwrap(), vec![mine.clone()]);
        assert!(store.find_for_owner(1, theirs.id).await.unwrap().is_none());
        assert!(
            store
                .update_for_owner(1, theirs.id, &request("hijacked"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete_for_owner(1, theirs.id).await.unwrap());
        assert_eq!(
            store.find_for_owner(2, theirs.id).await.unwrap().unwrap().title,
            "theirs"
        );
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = InMemoryTodoStore::new();
        let todo = store.create(1, &request("draft")).await.unwrap();

        let mut change = request("final");
        change.complete = true;
        let updated = store
            .update_for_owner(1, todo.id, &change)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "final");
        assert!(updated.complete);

        assert!(store.delete_for_owner(1, todo.id).await.unwrap());
        assert!(!store.delete_for_owner(1, todo.id).await.unwrap());
        assert!(store.list_for_owner(1).await.unwrap().is_empty());
    }
}
