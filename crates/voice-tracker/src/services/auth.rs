//! Authentication service
//!
//! Dashboard access is a single shared password exchanged for a short-lived
//! bearer token.

use tracing::{info, instrument, warn};
use voice_common::{verify_shared_secret, AccessToken, AppError, Claims};

use crate::dto::LoginRequest;

use super::context::TrackerContext;
use super::error::TrackerResult;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a TrackerContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a TrackerContext) -> Self {
        Self { ctx }
    }

    /// Exchange the dashboard password for an access token
    #[instrument(skip(self, request))]
    pub fn login(&self, request: &LoginRequest) -> TrackerResult<AccessToken> {
        if !verify_shared_secret(&request.password, &self.ctx.settings().dashboard_password) {
            warn!("Dashboard login rejected");
            return Err(AppError::InvalidCredentials.into());
        }

        let token = self.ctx.jwt_service().issue()?;
        info!(expires_in = token.expires_in, "Dashboard session started");
        Ok(token)
    }

    /// Check a bearer token
    pub fn validate_token(&self, token: &str) -> TrackerResult<Claims> {
        Ok(self.ctx.jwt_service().validate(token)?)
    }
}
