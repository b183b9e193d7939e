//! Tournament lifecycle.
//!
//! This module implements:
//! - TournamentActor: async actor owning one tournament's entries and ranking
//! - TournamentManager: spawns actors and routes joins, ticks and signals
//! - Settlement: refunds and prize payouts when a tournament ends
//!
//! ## Architecture
//!
//! Each tournament runs in its own Tokio task with an mpsc inbox, so every
//! mutation of its entries is serialized. Readers get standings and state
//! from watch channels without going through the inbox.
//!
//! ## Example
//!
//! ```no_run
//! use pool_arena::config::ArenaConfig;
//! use pool_arena::tournament::{TournamentConfig, TournamentManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = TournamentManager::new(ArenaConfig::default());
//!
//!     let config = TournamentConfig::daily("Daily Lightning Battle", 324_000, chrono::Utc::now());
//!     let tournament_id = manager.create_tournament(config).await?;
//!     manager.start_tournament(tournament_id).await?;
//!
//!     println!("Created tournament: {}", tournament_id);
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod errors;
pub mod manager;
pub mod messages;
pub mod models;

pub use actor::{ArenaContext, TournamentActor, TournamentHandle};
pub use errors::{TickRejection, TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use messages::TournamentMessage;
pub use models::{
    Entry, EntryId, LifecycleSignal, PerformanceSnapshot, PerformanceTick, PrizeStructure,
    SettledEntry, SettlementReport, TournamentConfig, TournamentId, TournamentInfo,
    TournamentState, TournamentType,
};
