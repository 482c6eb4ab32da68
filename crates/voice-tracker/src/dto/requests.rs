//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

/// Dashboard login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 256, message = "Password must be 1-256 characters"))]
    pub password: String,
}

/// Query string for the stats endpoint
///
/// The configured maximum is enforced by the query service; this only
/// rejects values no configuration could allow.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StatsQuery {
    #[validate(range(min = 0, max = 36500, message = "days must be between 0 and 36500"))]
    pub days: Option<i64>,
}

impl StatsQuery {
    /// Window length in days, if given
    pub fn window_days(&self) -> Option<u32> {
        self.days.and_then(|d| u32::try_from(d).ok())
    }
}
