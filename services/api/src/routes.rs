//! API service routes

use auth::middleware::{CurrentUser, require_bearer};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::TodoRequest,
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/todo", get(read_all).post(create_todo))
        .route(
            "/todo/:todo_id",
            get(read_todo).put(update_todo).delete(delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_bearer,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// List the caller's todos
pub async fn read_all(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let todos = state.todo_store.list_for_owner(user.user_id).await?;
    Ok(Json(todos))
}

/// Get one of the caller's todos
pub async fn read_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(todo_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let todo = state
        .todo_store
        .find_for_owner(user.user_id, todo_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(todo))
}

/// Create a todo owned by the caller
pub async fn create_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate()?;

    let todo = state.todo_store.create(user.user_id, &payload).await?;
    info!("User {} created todo {}", user.username, todo.id);

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Replace one of the caller's todos
pub async fn update_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(todo_id): Path<i64>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate()?;

    let todo = state
        .todo_store
        .update_for_owner(user.user_id, todo_id, &payload)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(todo))
}

/// Delete one of the caller's todos
pub async fn delete_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(todo_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    if state
        .todo_store
        .delete_for_owner(user.user_id, todo_id)
        .await?
    {
        info!("User {} deleted todo {}", user.username, todo_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
