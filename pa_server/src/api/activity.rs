//! Performance feed and activity feed handlers.

use super::{AppState, error::ApiResult};
use crate::metrics;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use pool_arena::{activity::ActivityEvent, tournament::PerformanceTick};
use serde::Deserialize;

/// Events returned when `n` is not given
pub const DEFAULT_ACTIVITY_COUNT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub n: Option<usize>,
}

/// Apply one performance tick.
///
/// Returns `202 Accepted` once the tournament has accepted the values; the
/// standings reflect them shortly after. Stale or non-finite ticks get `422`.
pub async fn submit_tick(
    State(state): State<AppState>,
    Json(tick): Json<PerformanceTick>,
) -> ApiResult<StatusCode> {
    match state.manager.submit_performance_tick(tick).await {
        Ok(()) => {
            metrics::ticks_total("accepted");
            Ok(StatusCode::ACCEPTED)
        }
        Err(e) => {
            metrics::ticks_total("rejected");
            Err(e.into())
        }
    }
}

/// Most recent activity events, newest first.
pub async fn recent_activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Json<Vec<ActivityEvent>> {
    let n = query.n.unwrap_or(DEFAULT_ACTIVITY_COUNT);
    Json(state.manager.get_recent_activity(n).await)
}
