//! Request origin extractor for the audit trail.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use domain::models::RequestContext;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use crate::middleware::RequestId;

const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

/// Where a ledger request came from.
///
/// The origin is the first `X-Forwarded-For` entry, falling back to the peer
/// address. Requests with neither are recorded as internal.
#[derive(Debug, Clone, Default)]
pub struct LedgerContext(pub RequestContext);

fn forwarded_origin(parts: &Parts) -> Option<IpAddr> {
    parts
        .headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse().ok())
}

#[async_trait]
impl<S> FromRequestParts<S> for LedgerContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let origin = forwarded_origin(parts).or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        });
        let request_id = RequestId::from_extensions(&parts.extensions);

        Ok(LedgerContext(RequestContext::new(origin, request_id)))
    }
}
