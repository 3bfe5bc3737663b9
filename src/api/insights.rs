//! Insights, writing prompts and stateless classification

use super::{ApiResult, AppState, Owner};
use crate::emotion::{growth_metrics, growth_score, insights, writing_prompt, EmotionResult};
use crate::emotion::{GrowthMetrics, Insight};
use crate::error::Error;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub fn insights_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/insights", get(get_insights))
        .route("/api/v1/prompt", get(get_prompt))
        .route("/api/v1/classify", post(classify_text))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsightsResponse {
    insights: Vec<Insight>,
    metrics: Option<GrowthMetrics>,
    growth_score: u8,
    prompt: String,
}

#[derive(Debug, Serialize)]
struct PromptResponse {
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    text: String,
}

/// Insights over unlocked letters plus diary entries
async fn get_insights(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> ApiResult<Json<InsightsResponse>> {
    let mut samples = state.letters.emotion_samples(&owner, state.now()).await?;
    samples.extend(state.diary.emotion_samples(&owner).await?);
    let tasks = state.letters.tasks().list(&owner, true).await?;
    let completed = tasks.iter().filter(|t| t.completed).count();
    let letters = state.letters.count(&owner).await?;

    let last_score = samples
        .iter()
        .max_by_key(|s| s.created_at)
        .map(|s| s.sentiment_score);
    let prompt = writing_prompt(last_score, &mut rand::thread_rng()).to_string();

    Ok(Json(InsightsResponse {
        insights: insights(&samples),
        metrics: growth_metrics(&samples),
        growth_score: growth_score(&samples, completed, tasks.len(), letters),
        prompt,
    }))
}

async fn get_prompt(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> ApiResult<Json<PromptResponse>> {
    let last_score = state
        .diary
        .emotion_samples(&owner)
        .await?
        .into_iter()
        .max_by_key(|s| s.created_at)
        .map(|s| s.sentiment_score);
    let prompt = writing_prompt(last_score, &mut rand::thread_rng()).to_string();
    Ok(Json(PromptResponse { prompt }))
}

async fn classify_text(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> ApiResult<Json<EmotionResult>> {
    if req.text.trim().is_empty() {
        return Err(Error::Validation("Text is required".to_string()).into());
    }
    Ok(Json(state.classifier.classify(&req.text)))
}
