//! Ranking engine.
//!
//! Orders a tournament's entries by battle score and applies the disclosure
//! policy: the top `K` standings carry their exact performance, everyone below
//! is only visible as a member of a rank-range bucket with a qualitative label.
//!
//! ## Example
//!
//! ```
//! use pool_arena::config::ArenaConfig;
//! use pool_arena::ranking::{DisclosurePolicy, RankingEngine};
//! use std::collections::HashMap;
//!
//! let engine = RankingEngine::new(DisclosurePolicy::from_config(&ArenaConfig::default()));
//! let standings = engine.rank(&[], &HashMap::new());
//! assert!(standings.is_empty());
//! ```

pub mod disclosure;
pub mod engine;
pub mod sealed;

pub use disclosure::{DisclosurePolicy, DisclosureTier, PerformanceLabel, RankBucket};
pub use engine::{Disclosure, Leaderboard, RankMovement, RankedStanding, RankingEngine};
pub use sealed::SealedValue;
