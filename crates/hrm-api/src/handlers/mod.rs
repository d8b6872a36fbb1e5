//! HTTP request handlers

pub mod catalog;
pub mod health;
pub mod roles;
pub mod users;

use axum::http::HeaderMap;
use uuid::Uuid;

/// Header carrying the id of the back-office user making the change.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Audit actor from the request headers; absent or malformed ids are ignored.
pub(crate) fn actor(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
}
