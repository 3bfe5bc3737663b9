//! Public wall endpoints
//!
//! The wall is anonymous, so none of these routes read the owner header.

use super::{ApiResult, AppState};
use crate::error::Error;
use crate::wall::{SharedLetter, WallEntry, WallFilter};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

pub fn wall_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/wall", get(list_wall))
        .route("/api/v1/wall/tags", get(list_tags))
        .route("/api/v1/wall/:id", get(get_shared))
        .route("/api/v1/wall/:id/like", post(like_shared))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct LikeResponse {
    likes: u64,
}

async fn list_wall(
    State(state): State<AppState>,
    Query(filter): Query<WallFilter>,
) -> ApiResult<Json<Vec<WallEntry>>> {
    Ok(Json(state.wall.list(&filter).await?))
}

async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.wall.tags().await?))
}

async fn get_shared(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SharedLetter>> {
    let shared = state
        .wall
        .get(&id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("shared letter {}", id)))?;
    Ok(Json(shared))
}

async fn like_shared(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LikeResponse>> {
    let likes = state.wall.like(&id).await?;
    Ok(Json(LikeResponse { likes }))
}
