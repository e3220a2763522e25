use crate::domain::models::actor::{Actor, Role};
use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::Span;

/// Pulls the authenticated actor out of the identity-provider headers.
/// The gateway in front of this service verifies the token and asserts
/// `x-actor-id` / `x-actor-role`; we trust both verbatim.
pub struct AuthActor(pub Actor);

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-actor-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?
            .to_string();

        let role: Role = parts
            .headers
            .get("x-actor-role")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?
            .parse()
            .map_err(|_| AppError::Unauthorized)?;

        Span::current().record("user_id", id.as_str());

        Ok(AuthActor(Actor { id, role }))
    }
}
