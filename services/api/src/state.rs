//! Application state shared across handlers

use std::sync::Arc;

use auth::TokenService;

use crate::repositories::TodoStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub todo_store: Arc<dyn TodoStore>,
    pub tokens: TokenService,
}
