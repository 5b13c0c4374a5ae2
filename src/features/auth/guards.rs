//! Role-based authorization guards.
//!
//! Guards read the `Session` placed in request extensions by the session
//! middleware and reject requests whose role is insufficient.

use crate::core::error::AppError;
use crate::features::auth::model::Session;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for administrator-only handlers.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(session): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub Session);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if !session.is_admin() {
            return Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }

        Ok(RequireAdmin(session.clone()))
    }
}
