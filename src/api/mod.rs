//! HTTP API for FutureSelf
//!
//! Merges the module routers into a single axum `Router` with CORS,
//! request tracing and a shared application state.
//!
//! ## Endpoint Map
//!
//! | Prefix                    | Module   | Description                              |
//! |---------------------------|----------|------------------------------------------|
//! | `/health`                 | api      | Liveness check                           |
//! | `/api/v1/letters/*`       | letters  | Seal, open, edit, share, respond, delete |
//! | `/api/v1/tasks/*`         | tasks    | Tasks that gate letters                  |
//! | `/api/v1/diary/*`         | diary    | Sealed diary entries                     |
//! | `/api/v1/wall/*`          | wall     | Public feed of shared letters            |
//! | `/api/v1/insights`        | insights | Insights, growth score, writing prompt   |
//! | `/api/v1/classify`        | insights | Stateless emotion classification         |
//!
//! Every route except `/health`, `/api/v1/classify` and the wall reads
//! the caller from the `x-owner-id` header.

pub mod diary;
pub mod error;
pub mod extract;
pub mod insights;
pub mod letters;
pub mod tasks;
pub mod wall;

pub use error::{ApiError, ApiResult};
pub use extract::{Owner, OWNER_HEADER};

use crate::config::{resolve_secret_from_env, FutureSelfConfig};
use crate::crypto::{AesGcmCipher, Cipher};
use crate::emotion::EmotionClassifier;
use crate::error::Result;
use crate::lifecycle::{Clock, DiaryManager, LetterManager, SystemClock};
use crate::store::{open_store, Repository, RetryPolicy};
use crate::vault::Gatekeeper;
use crate::wall::LetterWall;
use axum::{
    http::{header, HeaderName, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub letters: LetterManager,
    pub diary: DiaryManager,
    pub wall: LetterWall,
    pub classifier: Arc<EmotionClassifier>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wire every manager around one repository and one cipher
    pub fn new(
        config: &FutureSelfConfig,
        repo: Repository,
        cipher: Arc<dyn Cipher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let classifier = Arc::new(EmotionClassifier::new(&config.classifier)?);
        let wall = LetterWall::new(repo.clone(), config.vault.max_share_tags);
        let letters = LetterManager::new(
            repo.clone(),
            cipher.clone(),
            classifier.clone(),
            Gatekeeper::from_config(&config.vault),
            wall.clone(),
        );
        let diary = DiaryManager::new(repo, cipher, classifier.clone());

        Ok(Self {
            letters,
            diary,
            wall,
            classifier,
            clock,
        })
    }

    /// Open the configured store and derive the vault key from the
    /// environment secret
    pub async fn from_config(config: &FutureSelfConfig) -> Result<Self> {
        let secret = resolve_secret_from_env(&config.crypto)?;
        let cipher: Arc<dyn Cipher> = Arc::new(AesGcmCipher::from_secret(&secret)?);
        let store = open_store(&config.storage).await?;
        let repo = Repository::new(store, RetryPolicy::from_config(&config.retry));

        tracing::info!(backend = repo.backend(), "Vault storage ready");
        Self::new(config, repo, cipher, Arc::new(SystemClock))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Build the complete FutureSelf HTTP application
pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(letters::letters_router(state.clone()))
        .merge(tasks::tasks_router(state.clone()))
        .merge(diary::diary_router(state.clone()))
        .merge(wall::wall_router(state.clone()))
        .merge(insights::insights_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(cors_origins))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Empty `origins` allows any origin
fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(OWNER_HEADER),
        ]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::crypto::VaultKey;
    use crate::lifecycle::ManualClock;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use serde_json::Value;

    pub fn state() -> (AppState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let state = AppState::new(
            &FutureSelfConfig::default(),
            Repository::in_memory(),
            Arc::new(AesGcmCipher::new(VaultKey::generate())),
            clock.clone(),
        )
        .unwrap();
        (state, clock)
    }

    pub fn request(method: &str, uri: &str, owner: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(owner) = owner {
            builder = builder.header(OWNER_HEADER, owner);
        }
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
