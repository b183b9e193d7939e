//! HTTP server for LP position battles.
//!
//! Exposes the `pool_arena` tournament manager over a JSON API and drives
//! tournament schedules from a clock loop.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
