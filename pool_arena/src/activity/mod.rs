//! Activity feed.
//!
//! Discrete events (rank changes, big wins, new joins, milestones) derived
//! from ranking recomputations and entry creation. The feed keeps only the
//! most recent events, newest first.

pub mod detector;
pub mod feed;
pub mod models;

pub use detector::ActivityDetector;
pub use feed::{ActivityFeed, ActivityLog};
pub use models::{ActivityEvent, ActivityKind};
