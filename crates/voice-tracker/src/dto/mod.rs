//! Data transfer objects for API requests and responses

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{LoginRequest, StatsQuery};
pub use responses::{
    DayTotalResponse, EventAcceptedResponse, GuildResponse, HealthChecks,
    HealthResponse, MemberStatsResponse, ReadinessResponse,
};
