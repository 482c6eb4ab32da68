//! Authentication handlers

use axum::{extract::State, Json};
use voice_common::AccessToken;
use voice_tracker::dto::LoginRequest;
use voice_tracker::AuthService;

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// Exchange the dashboard password for a bearer token
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AccessToken>> {
    let token = AuthService::new(state.tracker()).login(&request)?;
    Ok(Json(token))
}
