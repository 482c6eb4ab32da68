//! Response DTOs for API endpoints

use chrono::{DateTime, Utc};
use serde::Serialize;
use voice_core::{DayKey, Snowflake};

/// Guild listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuildResponse {
    pub id: Snowflake,
    pub name: String,
}

/// One ranked row of guild stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberStatsResponse {
    pub member_id: Snowflake,
    pub name: String,
    pub total_seconds: u64,
    pub formatted_time: String,
    pub is_online: bool,
}

/// One day of a member's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTotalResponse {
    pub day: DayKey,
    pub seconds: u64,
}

/// Acknowledgement for a queued platform event
#[derive(Debug, Clone, Serialize)]
pub struct EventAcceptedResponse {
    pub accepted: bool,
    pub event_type: &'static str,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub store: String,
    pub ingestor: String,
}

impl ReadinessResponse {
    pub fn ready(store_healthy: bool, ingestor_running: bool) -> Self {
        let all_healthy = store_healthy && ingestor_running;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                store: if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
                ingestor: if ingestor_running { "running" } else { "stopped" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
