//! Tournament actor message types.

use super::{
    errors::TournamentResult,
    models::{
        Entry, EntryId, LifecycleSignal, PerformanceTick, SettlementReport, TournamentInfo,
        TournamentState,
    },
};
use crate::{eligibility::Eligibility, participant::ParticipantId, position::PositionId};
use tokio::sync::oneshot;

/// Messages that can be sent to a TournamentActor
#[derive(Debug)]
pub enum TournamentMessage {
    /// Enter a position into the tournament
    Join {
        participant: ParticipantId,
        position_id: PositionId,
        response: oneshot::Sender<TournamentResult<Entry>>,
    },

    /// Check whether a position could enter
    CheckEligibility {
        position_id: PositionId,
        response: oneshot::Sender<TournamentResult<Eligibility>>,
    },

    /// Apply a performance update.
    ///
    /// The reply, if requested, is sent before the ranking is recomputed.
    SubmitTick {
        tick: PerformanceTick,
        response: Option<oneshot::Sender<TournamentResult<()>>>,
    },

    /// Disqualify running entries on a position that went out of range
    Disqualify { position_id: PositionId },

    /// Scheduler signal
    Transition {
        signal: LifecycleSignal,
        response: oneshot::Sender<TournamentResult<TournamentState>>,
    },

    /// Get tournament information
    GetInfo {
        response: oneshot::Sender<TournamentInfo>,
    },

    /// Get one entry
    GetEntry {
        entry_id: EntryId,
        response: oneshot::Sender<Option<Entry>>,
    },

    /// Get the settlement report once ended
    GetSettlement {
        response: oneshot::Sender<Option<SettlementReport>>,
    },

    /// Stop the actor
    Close,
}
