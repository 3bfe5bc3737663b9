//! Request extractors

use super::error::ApiError;
use crate::vault::OwnerId;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Header carrying the caller's opaque identity
pub const OWNER_HEADER: &str = "x-owner-id";

/// Caller identity taken from the `x-owner-id` header.
///
/// Authentication happens upstream; the value is never inspected.
#[derive(Debug, Clone)]
pub struct Owner(pub OwnerId);

#[async_trait]
impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Owner(OwnerId::new(v)))
            .ok_or_else(|| ApiError::unauthenticated(format!("Missing {} header", OWNER_HEADER)))
    }
}
