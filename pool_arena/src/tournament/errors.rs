//! Tournament error types.

use super::models::{EntryId, TournamentId, TournamentState};
use crate::{eligibility::IneligibleReason, position::PositionId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Why a performance tick was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickRejection {
    /// Observed before the last applied tick
    Stale {
        last_applied: DateTime<Utc>,
        received: DateTime<Utc>,
    },
    /// A score or percentage is NaN or infinite
    NonFinite,
}

impl std::fmt::Display for TickRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickRejection::Stale {
                last_applied,
                received,
            } => write!(
                f,
                "stale timestamp {} (last applied {})",
                received.to_rfc3339(),
                last_applied.to_rfc3339()
            ),
            TickRejection::NonFinite => write!(f, "non-finite value"),
        }
    }
}

/// Tournament errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TournamentError {
    #[error("Position not eligible: {0}")]
    NotEligible(IneligibleReason),

    #[error("Tournament is closed")]
    TournamentClosed,

    #[error("Participant already entered this tournament")]
    DuplicateEntry,

    #[error("Tournament prize pool is full")]
    PrizePoolFull,

    #[error("Invalid tick for entry {entry_id}: {reason}")]
    InvalidTick {
        entry_id: EntryId,
        reason: TickRejection,
    },

    #[error("Tournament has not started")]
    NotStarted,

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: TournamentState,
        to: TournamentState,
    },

    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("Position not found: {0}")]
    PositionNotFound(PositionId),

    #[error("Position {0} belongs to another participant")]
    PositionNotOwned(PositionId),

    #[error("Invalid tournament configuration: {0}")]
    InvalidConfig(String),

    #[error("Tournament {0} is unavailable")]
    Unavailable(TournamentId),
}

impl TournamentError {
    /// Get a client-safe error message
    ///
    /// Internal identifiers of other participants' positions and of dead
    /// tournament tasks are not echoed back.
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::PositionNotOwned(_) => {
                "Position belongs to another participant".to_string()
            }
            TournamentError::Unavailable(_) => "Tournament is temporarily unavailable".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TournamentError::NotEligible(IneligibleReason::OutOfRange).to_string(),
            "Position not eligible: position is out of range"
        );
        assert_eq!(
            TournamentError::InvalidTransition {
                from: TournamentState::Upcoming,
                to: TournamentState::Ended,
            }
            .to_string(),
            "Invalid transition from upcoming to ended"
        );
    }

    #[test]
    fn test_stale_tick_message() {
        let last_applied = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 5).unwrap();
        let received = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let err = TournamentError::InvalidTick {
            entry_id: EntryId::nil(),
            reason: TickRejection::Stale {
                last_applied,
                received,
            },
        };

        assert!(err.to_string().contains("stale timestamp 2026-01-01T12:00:00+00:00"));
    }

    #[test]
    fn test_client_message_hides_ids() {
        let msg = TournamentError::PositionNotOwned(42).client_message();
        assert!(!msg.contains("42"));

        let msg = TournamentError::Unavailable(7).client_message();
        assert!(!msg.contains('7'));
    }
}
