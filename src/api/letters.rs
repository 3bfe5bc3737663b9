//! Letter endpoints
//!
//! - `GET    /api/v1/letters`: owner's letters (never decrypted)
//! - `POST   /api/v1/letters`: seal a new letter
//! - `GET    /api/v1/letters/:id`: open an unlocked letter
//! - `PATCH  /api/v1/letters/:id`: edit during the grace window
//! - `DELETE /api/v1/letters/:id`: delete in any state
//! - `POST   /api/v1/letters/:id/share`: publish to the wall
//! - `POST   /api/v1/letters/:id/responses`: reply to an opened letter
//! - `PUT    /api/v1/letters/:id/reflection`: reflect on an opened letter
//! - `GET    /api/v1/letters/:id/previous-mood`: mood of the letter before
//!   an unlocked one

use super::{ApiResult, AppState, Owner};
use crate::emotion::Mood;
use crate::error::Error;
use crate::vault::{LetterChanges, LetterDraft, LetterSummary, OpenedLetter};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub fn letters_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/letters", get(list_letters).post(create_letter))
        .route(
            "/api/v1/letters/:id",
            get(open_letter).patch(edit_letter).delete(delete_letter),
        )
        .route("/api/v1/letters/:id/share", post(share_letter))
        .route("/api/v1/letters/:id/responses", post(respond_to_letter))
        .route("/api/v1/letters/:id/reflection", put(reflect_on_letter))
        .route("/api/v1/letters/:id/previous-mood", get(previous_mood))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ShareRequest {
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareResponse {
    shared_id: String,
}

#[derive(Debug, Deserialize)]
struct RespondRequest {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ReflectRequest {
    reflection: String,
}

#[derive(Debug, Serialize)]
struct PreviousMoodResponse {
    mood: Option<Mood>,
}

async fn list_letters(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> ApiResult<Json<Vec<LetterSummary>>> {
    Ok(Json(state.letters.list(&owner, state.now()).await?))
}

async fn create_letter(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(draft): Json<LetterDraft>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.letters.create(&owner, draft, state.now()).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn open_letter(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> ApiResult<Json<OpenedLetter>> {
    let opened = state.letters.open(&id, &owner, state.now()).await?;
    let _preview = state.letters.preview(&opened);
    Ok(Json(opened))
}

async fn edit_letter(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    Json(changes): Json<LetterChanges>,
) -> ApiResult<StatusCode> {
    if changes.is_empty() {
        return Err(Error::Validation("No changes given".to_string()).into());
    }
    state.letters.edit(&id, &owner, state.now(), changes).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_letter(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.letters.delete(&id, &owner).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn share_letter(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    Json(req): Json<ShareRequest>,
) -> ApiResult<(StatusCode, Json<ShareResponse>)> {
    let now = state.now();
    let opened = state.letters.open(&id, &owner, now).await?;
    let shared_id = state.letters.share(&opened, &req.tags, now).await?;
    Ok((StatusCode::CREATED, Json(ShareResponse { shared_id })))
}

async fn respond_to_letter(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    Json(req): Json<RespondRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let now = state.now();
    let opened = state.letters.open(&id, &owner, now).await?;
    let id = state.letters.respond(&opened, &req.content, now).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn reflect_on_letter(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    Json(req): Json<ReflectRequest>,
) -> ApiResult<StatusCode> {
    state
        .letters
        .reflect(&id, &owner, state.now(), &req.reflection)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn previous_mood(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> ApiResult<Json<PreviousMoodResponse>> {
    let mood = state.letters.previous_mood(&id, &owner, state.now()).await?;
    Ok(Json(PreviousMoodResponse { mood }))
}
