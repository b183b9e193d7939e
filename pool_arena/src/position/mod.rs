//! Position registry for LP positions.
//!
//! Positions are owned by participants and staked into tournaments. Their
//! `in_range` flag is driven by price-range rebalancing outside the core; the
//! registry only records the latest value so eligibility can be decided.

pub mod errors;
pub mod models;
pub mod registry;

pub use errors::{PositionError, PositionResult};
pub use models::{NewPosition, PoolPair, Position, PositionId, RangeStrategy, RiskTier};
pub use registry::PositionRegistry;
