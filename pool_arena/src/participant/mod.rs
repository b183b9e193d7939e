//! Participant profiles.
//!
//! A participant is created the first time it joins a tournament and keeps
//! accumulating results (battles, wins, winnings, league) across tournaments.

pub mod models;
pub mod registry;

pub use models::{LeagueTier, Participant, ParticipantId};
pub use registry::ParticipantRegistry;
