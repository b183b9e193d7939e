//! Participant data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque address-like participant identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// League tiers, promoted by cumulative winnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeagueTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl LeagueTier {
    /// Minimum cumulative winnings (smallest currency unit) for each tier
    const THRESHOLDS: [(LeagueTier, i64); 4] = [
        (LeagueTier::Diamond, 5_000_000),
        (LeagueTier::Platinum, 1_000_000),
        (LeagueTier::Gold, 250_000),
        (LeagueTier::Silver, 50_000),
    ];

    /// League earned by the given cumulative winnings
    pub fn from_winnings(winnings: i64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(_, min)| winnings >= *min)
            .map(|(tier, _)| *tier)
            .unwrap_or(LeagueTier::Bronze)
    }

    /// The next tier up and the winnings needed to reach it
    pub fn next(self) -> Option<(LeagueTier, i64)> {
        Self::THRESHOLDS
            .iter()
            .rev()
            .find(|(tier, _)| *tier > self)
            .copied()
    }
}

impl fmt::Display for LeagueTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeagueTier::Bronze => write!(f, "bronze"),
            LeagueTier::Silver => write!(f, "silver"),
            LeagueTier::Gold => write!(f, "gold"),
            LeagueTier::Platinum => write!(f, "platinum"),
            LeagueTier::Diamond => write!(f, "diamond"),
        }
    }
}

/// Participant profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Cumulative prize winnings
    pub winnings: i64,
    /// Tournaments played to settlement
    pub battles: u32,
    /// Tournaments finished with a prize payout
    pub battles_won: u32,
    /// Best final rank ever achieved
    pub best_rank: Option<u32>,
    pub league: LeagueTier,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(id: ParticipantId, joined_at: DateTime<Utc>) -> Self {
        Self {
            id,
            winnings: 0,
            battles: 0,
            battles_won: 0,
            best_rank: None,
            league: LeagueTier::Bronze,
            joined_at,
        }
    }

    /// Record a settled tournament result.
    ///
    /// `final_rank` is `None` for a disqualified entry.
    pub fn record_result(&mut self, final_rank: Option<u32>, payout: i64) {
        self.battles += 1;

        if payout > 0 {
            self.battles_won += 1;
            self.winnings += payout;
        }

        if let Some(rank) = final_rank {
            self.best_rank = Some(self.best_rank.map_or(rank, |best| best.min(rank)));
        }

        self.league = LeagueTier::from_winnings(self.winnings);
    }

    /// Fraction of settled battles that paid out
    pub fn win_rate(&self) -> f64 {
        if self.battles == 0 {
            0.0
        } else {
            f64::from(self.battles_won) / f64::from(self.battles)
        }
    }
}
