//! Activity event models.

use crate::{participant::ParticipantId, tournament::models::TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Climbed the leaderboard; magnitude is the number of places gained
    RankChange,
    /// Score or fees jumped in a single tick; magnitude is the jump
    BigWin,
    /// Entered a tournament; magnitude is the entry fee
    NewJoin,
    /// Took first place; magnitude is the new rank
    Milestone,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::RankChange => write!(f, "rank_change"),
            ActivityKind::BigWin => write!(f, "big_win"),
            ActivityKind::NewJoin => write!(f, "new_join"),
            ActivityKind::Milestone => write!(f, "milestone"),
        }
    }
}

/// Immutable activity event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub tournament_id: TournamentId,
    pub participant: ParticipantId,
    pub magnitude: f64,
    pub occurred_at: DateTime<Utc>,
}

impl ActivityEvent {
    pub fn new(
        kind: ActivityKind,
        tournament_id: TournamentId,
        participant: ParticipantId,
        magnitude: f64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            tournament_id,
            participant,
            magnitude,
            occurred_at,
        }
    }
}
