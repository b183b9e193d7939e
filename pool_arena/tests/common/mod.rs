//! Shared fixtures for integration tests.
//!
//! `FakeFeed` stands in for the external performance feed: a seeded random
//! walk over each entry's snapshot with a monotonic clock.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use pool_arena::{
    ArenaConfig, TournamentManager,
    participant::ParticipantId,
    position::{NewPosition, PositionId, RangeStrategy, RiskTier},
    tournament::{
        Entry, EntryId, PerformanceSnapshot, PerformanceTick, TournamentConfig, TournamentId,
    },
};
use rand::{Rng, SeedableRng, rngs::StdRng};

const POOLS: [&str; 4] = ["ETH/USDC", "BTC/ETH", "SOL/USDC", "PEPE/ETH"];

/// Seeded random performance feed
pub struct FakeFeed {
    rng: StdRng,
    clock: DateTime<Utc>,
}

impl FakeFeed {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            clock: Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock
    }

    pub fn advance(&mut self, secs: i64) {
        self.clock += Duration::seconds(secs);
    }

    /// Next tick for an entry, jittered from `current`
    pub fn tick(&mut self, entry_id: EntryId, current: &PerformanceSnapshot) -> PerformanceTick {
        self.advance(1);

        let pnl_pct = current.pnl_pct + self.rng.random_range(-5.0..5.0);
        let fees_earned = current.fees_earned + self.rng.random_range(0..2_000);
        let battle_score = (current.battle_score + self.rng.random_range(-40.0..60.0)).max(0.0);

        PerformanceTick {
            entry_id,
            observed_at: self.clock,
            snapshot: PerformanceSnapshot {
                pnl_abs: (pnl_pct * 1_000.0) as i64,
                pnl_pct,
                fees_earned,
                battle_score,
            },
        }
    }

    /// Tick carrying an exact score
    pub fn scored(&mut self, entry_id: EntryId, battle_score: f64, pnl_pct: f64) -> PerformanceTick {
        self.advance(1);
        PerformanceTick {
            entry_id,
            observed_at: self.clock,
            snapshot: PerformanceSnapshot {
                pnl_abs: (pnl_pct * 1_000.0) as i64,
                pnl_pct,
                fees_earned: 0,
                battle_score,
            },
        }
    }
}

pub fn participant(n: usize) -> ParticipantId {
    ParticipantId::new(format!("0x{:04X}...{:04X}", n * 7919 % 65_536, n))
}

pub fn daily(title: &str, prize_pool: i64) -> TournamentConfig {
    TournamentConfig::daily(title, prize_pool, Utc::now())
}

/// Register an in-range position for a participant
pub async fn open_position(manager: &TournamentManager, owner: &ParticipantId, value: i64) -> PositionId {
    manager
        .positions()
        .create(NewPosition {
            owner: owner.clone(),
            pool: POOLS[(value as usize) % POOLS.len()].parse().unwrap(),
            value,
            apy_pct: 24.7,
            risk: RiskTier::Medium,
            strategy: RangeStrategy::Balanced,
        })
        .await
        .unwrap()
        .id
}

/// Create a tournament with `n` entrants, each with a 100.00 position
pub async fn tournament_with_entrants(
    manager: &TournamentManager,
    prize_pool: i64,
    n: usize,
) -> (TournamentId, Vec<Entry>) {
    let tournament_id = manager
        .create_tournament(daily("Daily Lightning Battle", prize_pool))
        .await
        .unwrap();

    let mut entries = Vec::with_capacity(n);
    for i in 1..=n {
        let owner = participant(i);
        let position_id = open_position(manager, &owner, 10_000).await;
        entries.push(manager.join(tournament_id, owner, position_id).await.unwrap());
    }

    (tournament_id, entries)
}

/// Wait until every message queued before this call has been processed
pub async fn drain(manager: &TournamentManager, tournament_id: TournamentId) {
    manager.get_tournament(tournament_id).await.unwrap();
}

pub fn manager() -> TournamentManager {
    TournamentManager::new(ArenaConfig::default())
}
