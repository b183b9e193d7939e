//! In-memory participant registry.

use super::models::{Participant, ParticipantId};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Participant registry shared by all tournaments
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: RwLock<HashMap<ParticipantId, Participant>>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a participant, creating the profile on first sight
    pub async fn ensure(&self, id: &ParticipantId) -> Participant {
        let mut participants = self.participants.write().await;
        participants
            .entry(id.clone())
            .or_insert_with(|| {
                log::info!("New participant {}", id);
                Participant::new(id.clone(), Utc::now())
            })
            .clone()
    }

    /// Get a participant profile
    pub async fn get(&self, id: &ParticipantId) -> Option<Participant> {
        self.participants.read().await.get(id).cloned()
    }

    /// Record a settled tournament result for a participant
    pub async fn record_result(&self, id: &ParticipantId, final_rank: Option<u32>, payout: i64) {
        let mut participants = self.participants.write().await;
        let participant = participants
            .entry(id.clone())
            .or_insert_with(|| Participant::new(id.clone(), Utc::now()));

        participant.record_result(final_rank, payout);
    }

    /// Number of known participants
    pub async fn len(&self) -> usize {
        self.participants.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.participants.read().await.is_empty()
    }
}
