//! Task endpoints

use super::{ApiResult, AppState, Owner};
use crate::vault::Task;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

pub fn tasks_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/tasks", get(list_tasks).post(add_task))
        .route("/api/v1/tasks/:id/complete", post(complete_task))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    #[serde(default)]
    include_completed: bool,
}

#[derive(Debug, Deserialize)]
struct AddTaskRequest {
    description: String,
}

async fn list_tasks(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(
        state
            .letters
            .tasks()
            .list(&owner, query.include_completed)
            .await?,
    ))
}

async fn add_task(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(req): Json<AddTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state
        .letters
        .tasks()
        .add(&owner, &req.description, state.now())
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn complete_task(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(
        state
            .letters
            .tasks()
            .complete(&id, &owner, state.now())
            .await?,
    ))
}
