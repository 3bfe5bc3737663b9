//! Diary endpoints

use super::{ApiResult, AppState, Owner};
use crate::emotion::Mood;
use crate::lifecycle::DiaryView;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

pub fn diary_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/diary", get(list_entries).post(write_entry))
        .route("/api/v1/diary/:id", delete(delete_entry))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteRequest {
    content: String,
    #[serde(default)]
    self_reported: Option<Mood>,
}

async fn list_entries(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> ApiResult<Json<Vec<DiaryView>>> {
    Ok(Json(state.diary.list(&owner).await?))
}

async fn write_entry(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(req): Json<WriteRequest>,
) -> ApiResult<(StatusCode, Json<DiaryView>)> {
    let view = state
        .diary
        .write(&owner, &req.content, req.self_reported, state.now())
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn delete_entry(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.diary.delete(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
