//! Guild handlers
//!
//! Read-only endpoints the dashboard polls.

use axum::{
    extract::{Path, State},
    Json,
};
use voice_tracker::dto::{DayTotalResponse, GuildResponse, MemberStatsResponse, StatsQuery};
use voice_tracker::QueryService;

use crate::extractors::{AuthUser, GuildIdPath, GuildMemberPath, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// List every known guild
///
/// GET /guilds
pub async fn list_guilds(State(state): State<AppState>, _auth: AuthUser) -> Json<Vec<GuildResponse>> {
    Json(QueryService::new(state.tracker()).list_guilds().await)
}

/// Ranked voice time for a guild
///
/// GET /guilds/{guild_id}/stats?days=N
pub async fn get_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<GuildIdPath>,
    ValidatedQuery(query): ValidatedQuery<StatsQuery>,
) -> ApiResult<Json<Vec<MemberStatsResponse>>> {
    let guild_id = path.guild_id()?;
    let rows = QueryService::new(state.tracker())
        .get_stats(guild_id, query.window_days())
        .await?;
    Ok(Json(rows))
}

/// A member's per-day history
///
/// GET /guilds/{guild_id}/members/{member_id}/days
pub async fn member_days(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<GuildMemberPath>,
) -> ApiResult<Json<Vec<DayTotalResponse>>> {
    let (guild_id, member_id) = path.ids()?;
    let days = QueryService::new(state.tracker())
        .member_days(guild_id, member_id)
        .await?;
    Ok(Json(days))
}
