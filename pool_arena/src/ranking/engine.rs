//! Standing computation and leaderboard assembly.

use super::{
    disclosure::{DisclosurePolicy, DisclosureTier, PerformanceLabel, RankBucket},
    sealed::SealedValue,
};
use crate::{
    participant::ParticipantId,
    position::PoolPair,
    tournament::models::{Entry, EntryId, PerformanceSnapshot, TournamentId},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{cmp::Ordering, collections::HashMap};

/// Performance of a standing as the public API may see it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Disclosure {
    Exact {
        performance: PerformanceSnapshot,
    },
    Bucketed {
        bucket: usize,
        #[serde(rename = "performance")]
        sealed: SealedValue<PerformanceSnapshot>,
    },
}

impl Disclosure {
    pub fn tier(&self) -> DisclosureTier {
        match self {
            Disclosure::Exact { .. } => DisclosureTier::Exact,
            Disclosure::Bucketed { .. } => DisclosureTier::Bucketed,
        }
    }

    /// Exact performance, `None` when sealed
    pub fn performance(&self) -> Option<&PerformanceSnapshot> {
        match self {
            Disclosure::Exact { performance } => Some(performance),
            Disclosure::Bucketed { .. } => None,
        }
    }

    fn snapshot(&self) -> &PerformanceSnapshot {
        match self {
            Disclosure::Exact { performance } => performance,
            Disclosure::Bucketed { sealed, .. } => sealed.unseal(),
        }
    }
}

/// Rank change since the previous leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "direction", content = "places", rename_all = "snake_case")]
pub enum RankMovement {
    Up(u32),
    Down(u32),
    Unchanged,
    /// Not ranked before
    New,
}

/// One ranked entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStanding {
    pub rank: u32,
    pub previous_rank: Option<u32>,
    pub entry_id: EntryId,
    pub participant: ParticipantId,
    pub pool: PoolPair,
    pub disclosure: Disclosure,
}

impl RankedStanding {
    pub fn tier(&self) -> DisclosureTier {
        self.disclosure.tier()
    }

    pub fn movement(&self) -> RankMovement {
        match self.previous_rank {
            None => RankMovement::New,
            Some(prev) if prev > self.rank => RankMovement::Up(prev - self.rank),
            Some(prev) if prev < self.rank => RankMovement::Down(self.rank - prev),
            Some(_) => RankMovement::Unchanged,
        }
    }
}

/// Immutable published standings of one tournament
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub tournament_id: TournamentId,
    /// Increases with every recomputation
    pub version: u64,
    pub computed_at: DateTime<Utc>,
    pub total_ranked: usize,
    pub standings: Vec<RankedStanding>,
    pub buckets: Vec<RankBucket>,
}

impl Leaderboard {
    pub fn empty(tournament_id: TournamentId) -> Self {
        Self {
            tournament_id,
            version: 0,
            computed_at: Utc::now(),
            total_ranked: 0,
            standings: Vec::new(),
            buckets: Vec::new(),
        }
    }

    /// Standings with exact performance, best first
    pub fn exact(&self) -> impl Iterator<Item = &RankedStanding> {
        self.standings
            .iter()
            .filter(|s| s.tier() == DisclosureTier::Exact)
    }

    pub fn standing_for(&self, participant: &ParticipantId) -> Option<&RankedStanding> {
        self.standings.iter().find(|s| &s.participant == participant)
    }

    pub fn standing_for_entry(&self, entry_id: EntryId) -> Option<&RankedStanding> {
        self.standings.iter().find(|s| s.entry_id == entry_id)
    }

    /// Current rank of every entry
    pub fn ranks(&self) -> HashMap<EntryId, u32> {
        self.standings.iter().map(|s| (s.entry_id, s.rank)).collect()
    }
}

/// Strict total order over entries: higher score first, then earlier entry,
/// then lower entry id.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.performance
        .battle_score
        .total_cmp(&a.performance.battle_score)
        .then_with(|| a.entered_at.cmp(&b.entered_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Pure standings calculator
#[derive(Debug, Clone)]
pub struct RankingEngine {
    policy: DisclosurePolicy,
}

impl RankingEngine {
    pub fn new(policy: DisclosurePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DisclosurePolicy {
        &self.policy
    }

    /// Rank every entry still in the battle.
    ///
    /// Disqualified entries are skipped. Ranks are `1..=n` with no ties;
    /// `previous` carries the ranks of the last published leaderboard.
    pub fn rank(&self, entries: &[Entry], previous: &HashMap<EntryId, u32>) -> Vec<RankedStanding> {
        let mut ordered: Vec<&Entry> = entries.iter().filter(|e| !e.disqualified).collect();
        ordered.sort_by(|a, b| compare_entries(a, b));

        ordered
            .into_iter()
            .zip(1u32..)
            .map(|(entry, rank)| {
                let disclosure = match self.policy.bucket_index(rank) {
                    None => Disclosure::Exact {
                        performance: entry.performance,
                    },
                    Some(bucket) => Disclosure::Bucketed {
                        bucket,
                        sealed: SealedValue::seal(entry.performance),
                    },
                };

                RankedStanding {
                    rank,
                    previous_rank: previous.get(&entry.id).copied(),
                    entry_id: entry.id,
                    participant: entry.participant.clone(),
                    pool: entry.pool.clone(),
                    disclosure,
                }
            })
            .collect()
    }

    /// Assemble a leaderboard with bucket summaries
    pub fn leaderboard(
        &self,
        tournament_id: TournamentId,
        version: u64,
        standings: Vec<RankedStanding>,
        computed_at: DateTime<Utc>,
    ) -> Leaderboard {
        let total_ranked = standings.len();
        let buckets = self.summarize_buckets(&standings);

        Leaderboard {
            tournament_id,
            version,
            computed_at,
            total_ranked,
            standings,
            buckets,
        }
    }

    fn summarize_buckets(&self, standings: &[RankedStanding]) -> Vec<RankBucket> {
        let total = u32::try_from(standings.len()).unwrap_or(u32::MAX);
        let mut members: Vec<(usize, Vec<f64>)> = Vec::new();

        for standing in standings {
            let Disclosure::Bucketed { bucket, .. } = standing.disclosure else {
                continue;
            };
            let pnl_pct = standing.disclosure.snapshot().pnl_pct;

            match members.last_mut() {
                Some((index, pcts)) if *index == bucket => pcts.push(pnl_pct),
                _ => members.push((bucket, vec![pnl_pct])),
            }
        }

        members
            .into_iter()
            .map(|(index, pcts)| {
                let (first_rank, upper) = self.policy.bucket_bounds(index);
                RankBucket {
                    index,
                    first_rank,
                    last_rank: upper.map_or(total, |u| u.min(total)),
                    size: pcts.len(),
                    label: PerformanceLabel::from_pnl_pcts(&pcts),
                }
            })
            .collect()
    }
}
