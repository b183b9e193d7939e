//! Tournament API handlers.
//!
//! # Examples
//!
//! Create a daily battle starting now:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/tournaments \
//!   -H "Content-Type: application/json" \
//!   -d '{"title": "Daily Battle", "tournament_type": "daily", "prize_pool": 100000}'
//! ```
//!
//! Enter a position:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/tournaments/1/join \
//!   -H "Content-Type: application/json" \
//!   -d '{"participant": "0xabc", "position_id": 1}'
//! ```

use super::{
    AppState,
    error::{ApiError, ApiResult},
};
use crate::metrics;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use pool_arena::{
    participant::ParticipantId,
    position::PositionId,
    ranking::Leaderboard,
    tournament::{
        Entry, SettlementReport, TournamentConfig, TournamentId, TournamentInfo, TournamentState,
        TournamentType,
    },
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListTournamentsQuery {
    pub state: Option<TournamentState>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub title: String,
    pub tournament_type: TournamentType,
    /// Guaranteed pool before entry fees
    #[serde(default)]
    pub prize_pool: i64,
    /// Defaults to the time of the request
    pub starts_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct JoinTournamentRequest {
    pub participant: ParticipantId,
    pub position_id: PositionId,
}

/// List tournaments, optionally filtered by `?state=upcoming|live|ended`.
pub async fn list_tournaments(
    State(state): State<AppState>,
    Query(query): Query<ListTournamentsQuery>,
) -> Json<Vec<TournamentInfo>> {
    Json(state.manager.list_tournaments(query.state).await)
}

/// Schedule a new tournament.
///
/// Returns `201 Created` with the tournament info, or `422` for an invalid
/// configuration.
pub async fn create_tournament(
    State(state): State<AppState>,
    Json(request): Json<CreateTournamentRequest>,
) -> ApiResult<(StatusCode, Json<TournamentInfo>)> {
    let config = TournamentConfig {
        title: request.title,
        tournament_type: request.tournament_type,
        prize_pool: request.prize_pool,
        starts_at: request.starts_at.unwrap_or_else(Utc::now),
    };

    let tournament_id = state.manager.create_tournament(config).await?;
    metrics::tournaments_created();

    let info = state.manager.get_tournament(tournament_id).await?;
    Ok((StatusCode::CREATED, Json(info)))
}

pub async fn get_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> ApiResult<Json<TournamentInfo>> {
    Ok(Json(state.manager.get_tournament(tournament_id).await?))
}

/// Latest published standings.
///
/// Only the top ranks carry readable performance; everything below is
/// reported by bucket.
pub async fn get_standings(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> ApiResult<Json<Leaderboard>> {
    let leaderboard = state.manager.get_standings(tournament_id).await?;
    Ok(Json(Leaderboard::clone(&leaderboard)))
}

/// Enter a position into a tournament.
///
/// # Errors
///
/// - `404 Not Found`: Unknown tournament or position
/// - `409 Conflict`: Tournament ended, position out of range or already
///   entered, participant already entered, or position owned by someone else
pub async fn join_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
    Json(request): Json<JoinTournamentRequest>,
) -> ApiResult<(StatusCode, Json<Entry>)> {
    let entry = state
        .manager
        .join(tournament_id, request.participant, request.position_id)
        .await?;
    metrics::entries_joined(tournament_id);

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_settlement(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> ApiResult<Json<SettlementReport>> {
    state
        .manager
        .settlement(tournament_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("Tournament {} has not been settled", tournament_id))
        })
}
