//! # Pool Arena
//!
//! Tournament core for LP position battles: participants stake liquidity
//! positions into daily or weekly tournaments and are ranked by an externally
//! supplied battle score.
//!
//! ## Architecture
//!
//! - **Position registry**: LP positions and their `in_range` flag
//! - **Eligibility**: pure entry checks, fee and refund rules
//! - **Tournament**: one actor per tournament serializes joins, ticks and
//!   lifecycle signals, then settles refunds and payouts
//! - **Ranking**: deterministic ordering with exact disclosure for the top
//!   standings and sealed, bucketed performance below
//! - **Activity**: bounded feed of events derived from ranking deltas
//!
//! ## Core Modules
//!
//! - [`tournament`]: Lifecycle manager, actors, settlement
//! - [`ranking`]: Ranking engine and disclosure policy
//! - [`activity`]: Activity feed
//!
//! ## Example
//!
//! ```
//! use pool_arena::{ArenaConfig, eligibility::compute_entry_fee};
//!
//! let config = ArenaConfig::default();
//! // 2% of $4,250.00
//! assert_eq!(compute_entry_fee(425_000, config.fee_rate_bps), 8_500);
//! ```

/// Activity feed and event detection.
pub mod activity;

/// Arena configuration.
pub mod config;
pub use config::{ArenaConfig, ConfigError};

/// Eligibility, entry fee and refund rules.
pub mod eligibility;
pub use eligibility::{Eligibility, IneligibleReason};

/// Participant profiles.
pub mod participant;

/// LP position registry.
pub mod position;

/// Ranking engine and disclosure policy.
pub mod ranking;

/// Tournament lifecycle, actors and settlement.
pub mod tournament;
pub use tournament::{TournamentError, TournamentManager, TournamentResult};
