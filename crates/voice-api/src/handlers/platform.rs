//! Platform ingress
//!
//! The platform bridge pushes gateway dispatches here; they are queued for
//! the ingestor and applied in arrival order.

use axum::{extract::State, Json};
use tracing::debug;
use voice_tracker::dto::EventAcceptedResponse;
use voice_tracker::PlatformEvent;

use crate::extractors::{AuthUser, JsonBody};
use crate::response::{Accepted, ApiResult};
use crate::state::AppState;

/// Queue one platform event
///
/// POST /platform/events
pub async fn ingest_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    JsonBody(event): JsonBody<PlatformEvent>,
) -> ApiResult<Accepted<Json<EventAcceptedResponse>>> {
    let event_type = event.kind();
    state.ingest().submit(event)?;
    debug!(event_type, "Platform event queued");

    Ok(Accepted(Json(EventAcceptedResponse {
        accepted: true,
        event_type,
    })))
}
