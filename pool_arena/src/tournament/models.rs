//! Tournament data models.

use crate::{
    config::{BPS_DENOMINATOR, MAX_AMOUNT},
    participant::ParticipantId,
    position::{PoolPair, PositionId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tournament ID type
pub type TournamentId = i64;

/// Entry ID type
pub type EntryId = Uuid;

/// Tournament state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentState {
    /// Scheduled, accepting registrations
    Upcoming,
    /// Battle in progress
    Live,
    /// Finished and settled
    Ended,
}

impl TournamentState {
    /// Whether new entries may still be registered
    pub fn accepts_entries(self) -> bool {
        matches!(self, TournamentState::Upcoming | TournamentState::Live)
    }
}

impl std::fmt::Display for TournamentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentState::Upcoming => write!(f, "upcoming"),
            TournamentState::Live => write!(f, "live"),
            TournamentState::Ended => write!(f, "ended"),
        }
    }
}

impl std::str::FromStr for TournamentState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upcoming" => Ok(TournamentState::Upcoming),
            "live" => Ok(TournamentState::Live),
            "ended" => Ok(TournamentState::Ended),
            other => Err(format!("Unknown tournament state: {}", other)),
        }
    }
}

/// Tournament type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentType {
    /// 24 hour battle
    Daily,
    /// 7 day battle
    Weekly,
}

/// Lifecycle signal delivered by the external scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleSignal {
    /// Start time reached
    Start,
    /// End time reached
    End,
}

/// Tournament configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Tournament title
    pub title: String,
    /// Tournament type
    pub tournament_type: TournamentType,
    /// Guaranteed prize pool, before entry fees
    pub prize_pool: i64,
    /// Scheduled start time
    pub starts_at: DateTime<Utc>,
}

impl TournamentConfig {
    /// Create a daily tournament configuration
    pub fn daily(title: impl Into<String>, prize_pool: i64, starts_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            tournament_type: TournamentType::Daily,
            prize_pool,
            starts_at,
        }
    }

    /// Create a weekly tournament configuration
    pub fn weekly(title: impl Into<String>, prize_pool: i64, starts_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            tournament_type: TournamentType::Weekly,
            prize_pool,
            starts_at,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Tournament title must not be empty".to_string());
        }

        if self.prize_pool < 0 {
            return Err("Prize pool must not be negative".to_string());
        }

        if self.prize_pool > MAX_AMOUNT {
            return Err(format!("Prize pool must be at most {}", MAX_AMOUNT));
        }

        Ok(())
    }
}

/// Live performance snapshot of an entry
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    /// Absolute PnL in the smallest currency unit
    pub pnl_abs: i64,
    /// PnL in percent of the entered position value
    pub pnl_pct: f64,
    /// Fees earned in the smallest currency unit
    pub fees_earned: i64,
    /// Externally supplied score that drives ranking
    pub battle_score: f64,
}

impl PerformanceSnapshot {
    /// Whether every floating point field is a finite number
    pub fn is_finite(&self) -> bool {
        self.pnl_pct.is_finite() && self.battle_score.is_finite()
    }
}

/// Performance update delivered by the external feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTick {
    pub entry_id: EntryId,
    /// When the feed observed these values
    pub observed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: PerformanceSnapshot,
}

/// A participant's position committed to a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub tournament_id: TournamentId,
    pub participant: ParticipantId,
    pub position_id: PositionId,
    pub pool: PoolPair,
    pub entered_at: DateTime<Utc>,
    /// Fee charged on entry
    pub entry_fee: i64,
    /// Set at settlement
    pub refund_eligible: Option<bool>,
    pub performance: PerformanceSnapshot,
    /// Observation time of the last applied tick
    pub last_tick_at: Option<DateTime<Utc>>,
    /// Position left its range while the tournament was running
    pub disqualified: bool,
}

/// Prize structure for a settled tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeStructure {
    /// Total prize pool
    pub total_pool: i64,
    /// Payouts by position (1st, 2nd, 3rd, etc.)
    pub payouts: Vec<i64>,
}

impl PrizeStructure {
    /// Split a pool by per-position shares in basis points.
    ///
    /// Only as many positions as there are ranked entrants are paid. Rounding
    /// dust and shares nobody finished in go to first place, so payouts always
    /// add up to `total_pool`.
    pub fn from_shares(total_pool: i64, shares_bps: &[u32], entrants: usize) -> Self {
        if entrants == 0 || total_pool <= 0 {
            return Self {
                total_pool,
                payouts: Vec::new(),
            };
        }

        let paid = entrants.min(shares_bps.len());
        let mut payouts: Vec<i64> = shares_bps
            .iter()
            .take(paid)
            .map(|&share| {
                (i128::from(total_pool) * i128::from(share) / i128::from(BPS_DENOMINATOR)) as i64
            })
            .collect();

        if payouts.is_empty() {
            payouts.push(0);
        }

        let distributed: i64 = payouts.iter().sum();
        payouts[0] += total_pool - distributed;

        Self {
            total_pool,
            payouts,
        }
    }

    /// Get payout for a specific position (1-indexed)
    pub fn payout_for_position(&self, position: usize) -> Option<i64> {
        if position == 0 || position > self.payouts.len() {
            None
        } else {
            Some(self.payouts[position - 1])
        }
    }
}

/// Settlement outcome of one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledEntry {
    pub entry_id: EntryId,
    pub participant: ParticipantId,
    /// `None` for a disqualified entry
    pub final_rank: Option<u32>,
    pub refund_eligible: bool,
    pub refund_amount: i64,
    pub payout: i64,
}

/// Settlement report produced when a tournament ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub tournament_id: TournamentId,
    pub settled_at: DateTime<Utc>,
    /// Entries that finished ranked
    pub total_ranked: u32,
    /// Entry fees refunded
    pub refunded_fees: i64,
    /// Guaranteed pool plus retained fees
    pub prize_structure: PrizeStructure,
    /// Results in final rank order, disqualified entries last
    pub results: Vec<SettledEntry>,
}

/// Tournament information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentInfo {
    /// Tournament ID
    pub id: TournamentId,
    /// Tournament configuration
    pub config: TournamentConfig,
    /// Current state
    pub state: TournamentState,
    /// Scheduled end time
    pub ends_at: DateTime<Utc>,
    /// Registered entries, including disqualified ones
    pub entrant_count: usize,
    /// Guaranteed pool plus collected entry fees
    pub prize_pool: i64,
    /// Seconds until the scheduled end (live tournaments only)
    pub time_remaining_secs: Option<i64>,
    /// Elapsed fraction of the schedule in `[0, 1]`
    pub progress: f64,
}

impl TournamentInfo {
    /// Elapsed fraction of a schedule at `now`
    pub fn progress_at(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let total = (ends_at - starts_at).num_seconds();
        if total <= 0 {
            return 1.0;
        }

        let elapsed = (now - starts_at).num_seconds();
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const DEFAULT_SHARES: [u32; 10] = [4_000, 2_000, 1_000, 300, 300, 300, 300, 300, 300, 300];

    #[test]
    fn test_prize_structure_matches_live_rewards() {
        // $3,240 pool: 40/20/10 podium, 3% down to tenth
        let prize = PrizeStructure::from_shares(324_000, &DEFAULT_SHARES, 89);
        assert_eq!(prize.payouts.len(), 10);
        assert_eq!(prize.payouts[1], 64_800);
        assert_eq!(prize.payouts[2], 32_400);
        assert_eq!(prize.payouts[3], 9_720);
        assert_eq!(prize.payouts.iter().sum::<i64>(), 324_000);
    }

    #[test]
    fn test_prize_structure_few_entrants() {
        let prize = PrizeStructure::from_shares(10_000, &DEFAULT_SHARES, 2);
        assert_eq!(prize.payouts, vec![8_000, 2_000]);
    }

    #[test]
    fn test_prize_structure_no_entrants() {
        let prize = PrizeStructure::from_shares(10_000, &DEFAULT_SHARES, 0);
        assert!(prize.payouts.is_empty());
    }

    #[test]
    fn test_prize_structure_without_shares_pays_winner() {
        let prize = PrizeStructure::from_shares(5_000, &[], 4);
        assert_eq!(prize.payouts, vec![5_000]);
    }

    #[test]
    fn test_payout_for_position() {
        let prize = PrizeStructure::from_shares(100_000, &DEFAULT_SHARES, 20);
        assert_eq!(prize.payout_for_position(1), Some(49_000));
        assert_eq!(prize.payout_for_position(2), Some(20_000));
        assert_eq!(prize.payout_for_position(10), Some(3_000));
        assert_eq!(prize.payout_for_position(11), None);
        assert_eq!(prize.payout_for_position(0), None);
    }

    #[test]
    fn test_state_accepts_entries() {
        assert!(TournamentState::Upcoming.accepts_entries());
        assert!(TournamentState::Live.accepts_entries());
        assert!(!TournamentState::Ended.accepts_entries());
    }

    #[test]
    fn test_state_parse() {
        assert_eq!("LIVE".parse::<TournamentState>(), Ok(TournamentState::Live));
        assert!("paused".parse::<TournamentState>().is_err());
    }

    #[test]
    fn test_config_validation() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(TournamentConfig::daily("Daily Lightning Battle #247", 324_000, start)
            .validate()
            .is_ok());
        assert!(TournamentConfig::daily("  ", 0, start).validate().is_err());
        assert!(TournamentConfig::weekly("Weekend Blitz", -1, start).validate().is_err());
        assert!(TournamentConfig::weekly("Whale Cup", MAX_AMOUNT, start).validate().is_ok());
        assert!(TournamentConfig::weekly("Whale Cup", i64::MAX, start).validate().is_err());
    }

    #[test]
    fn test_progress() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let end = start + Duration::hours(24);

        assert_eq!(TournamentInfo::progress_at(start, end, start - Duration::hours(1)), 0.0);
        assert_eq!(TournamentInfo::progress_at(start, end, start + Duration::hours(6)), 0.25);
        assert_eq!(TournamentInfo::progress_at(start, end, end + Duration::hours(1)), 1.0);
    }

    #[test]
    fn test_tick_deserializes_flat() {
        let json = r#"{
            "entry_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "observed_at": "2026-01-01T00:00:00Z",
            "pnl_abs": 284500,
            "pnl_pct": 127.4,
            "fees_earned": 23450,
            "battle_score": 2847.0
        }"#;

        let tick: PerformanceTick = serde_json::from_str(json).unwrap();
        assert_eq!(tick.snapshot.fees_earned, 23_450);
        assert_eq!(tick.snapshot.battle_score, 2847.0);
    }
}
