//! Authentication extractor
//!
//! Extracts and validates the dashboard bearer token from the
//! Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::response::ApiError;
use crate::state::AppState;

/// Caller holding a valid dashboard token
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Session id the token was issued for
    pub session_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let claims = app_state.jwt_service().validate(bearer.token()).map_err(|e| {
            tracing::warn!(error = %e, "Rejected dashboard token");
            ApiError::App(e)
        })?;

        let session_id = claims.session_id().map_err(ApiError::App)?;

        Ok(AuthUser { session_id })
    }
}
