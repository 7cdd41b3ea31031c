//! Acting-user extractor.
//!
//! Authentication happens upstream; by the time a request reaches the ledger
//! the auth layer has stamped the user id into `X-Actor-Id`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the authenticated user's id.
pub const ACTOR_ID_HEADER: &str = "X-Actor-Id";

/// The user performing a ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", ACTOR_ID_HEADER)))?;

        Uuid::parse_str(value)
            .map(Actor)
            .map_err(|_| ApiError::Unauthorized(format!("Invalid {} header", ACTOR_ID_HEADER)))
    }
}
