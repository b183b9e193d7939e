//! Position and participant API handlers.

use super::{
    AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use pool_arena::{
    Eligibility,
    participant::{Participant, ParticipantId},
    position::{NewPosition, Position, PositionId},
    tournament::TournamentId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RangeUpdateRequest {
    pub in_range: bool,
}

/// Participant profile with the positions they hold
#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    /// `None` until the participant has entered a tournament
    pub profile: Option<Participant>,
    pub positions: Vec<Position>,
}

/// Register a position. Returns `201 Created`.
pub async fn create_position(
    State(state): State<AppState>,
    Json(request): Json<NewPosition>,
) -> ApiResult<(StatusCode, Json<Position>)> {
    let position = state.manager.positions().create(request).await?;
    Ok((StatusCode::CREATED, Json(position)))
}

/// Record a range rebalance reported by the pool.
///
/// Leaving the range disqualifies the position's running entries.
pub async fn update_range(
    State(state): State<AppState>,
    Path(position_id): Path<PositionId>,
    Json(request): Json<RangeUpdateRequest>,
) -> ApiResult<Json<Position>> {
    let position = state
        .manager
        .update_position_range(position_id, request.in_range)
        .await?;
    Ok(Json(position))
}

pub async fn get_eligibility(
    State(state): State<AppState>,
    Path((position_id, tournament_id)): Path<(PositionId, TournamentId)>,
) -> ApiResult<Json<Eligibility>> {
    Ok(Json(
        state
            .manager
            .get_eligibility(position_id, tournament_id)
            .await?,
    ))
}

pub async fn get_participant(
    State(state): State<AppState>,
    Path(participant): Path<String>,
) -> ApiResult<Json<ParticipantResponse>> {
    let id = ParticipantId::new(participant);
    let profile = state.manager.get_participant(&id).await;
    let positions = state.manager.positions().list_for_owner(&id).await;

    if profile.is_none() && positions.is_empty() {
        return Err(ApiError::NotFound(format!("Participant not found: {}", id)));
    }

    Ok(Json(ParticipantResponse { profile, positions }))
}
