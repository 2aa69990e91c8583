//! API models for request and response payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;

/// Todo item, always owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: i16,
    pub complete: bool,
    #[serde(skip_serializing)]
    pub owner_id: i64,
}

/// Body of create and update requests
#[derive(Debug, Clone, Deserialize)]
pub struct TodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: i16,
    pub complete: bool,
}

impl TodoRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(1..=5).contains(&self.priority) {
            return Err(ApiError::Validation(
                "The priority must be between 1-5".to_string(),
            ));
        }

        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Title is required".to_string()));
        }

        if self.title.chars().count() > 200 {
            return Err(ApiError::Validation(
                "Title must be at most 200 characters long".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, priority: i16) -> TodoRequest {
        TodoRequest {
            title: title.to_string(),
            description: None,
            priority,
            complete: false,
        }
    }

    #[test]
    fn test_priority_bounds() {
        assert!(request("walk the dog", 1).validate().is_ok());
        assert!(request("walk the dog", 5).validate().is_ok());
        assert!(request("walk the dog", 0).validate().is_err());
        assert!(request("walk the dog", 6).validate().is_err());
    }

    #[test]
    fn test_title_required() {
        assert!(request("  ", 3).validate().is_err());
        assert!(request(&"t".repeat(201), 3).validate().is_err());
    }

    #[test]
    fn test_owner_is_not_serialized() {
        let todo = Todo {
            id: 1,
            title: "walk the dog".into(),
            description: None,
            priority: 2,
            complete: false,
            owner_id: 42,
        };
        let value = serde_json::to_value(todo).unwrap();
        assert!(value.get("owner_id").is_none());
        assert_eq!(value["priority"], 2);
    }
}
