//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake IDs from path parameters.

use serde::Deserialize;
use voice_core::Snowflake;

use crate::response::ApiError;

fn parse_id(raw: &str, field: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {field} format")))
}

/// Path parameters with guild_id
#[derive(Debug, Deserialize)]
pub struct GuildIdPath {
    pub guild_id: String,
}

impl GuildIdPath {
    /// Parse guild_id as Snowflake
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.guild_id, "guild_id")
    }
}

/// Path parameters with guild_id and member_id
#[derive(Debug, Deserialize)]
pub struct GuildMemberPath {
    pub guild_id: String,
    pub member_id: String,
}

impl GuildMemberPath {
    /// Parse both ids as Snowflakes
    pub fn ids(&self) -> Result<(Snowflake, Snowflake), ApiError> {
        Ok((
            parse_id(&self.guild_id, "guild_id")?,
            parse_id(&self.member_id, "member_id")?,
        ))
    }
}
