//! Arena configuration.
//!
//! Every tunable rule of the arena (entry fee, refund cutoff, disclosure
//! policy, feed size, tournament clocks, payout shares) lives here rather than
//! being hardcoded, since real values differ per deployment.

use crate::tournament::models::TournamentType;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Basis points in one whole (100%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Largest money amount accepted for a position value or a guaranteed prize
/// pool, in the smallest currency unit. Pool totals stay below this too.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Longest allowed tournament or retention period: one leap year
pub const MAX_DURATION_SECS: u64 = 366 * 24 * 60 * 60;

/// Arena configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Entry fee as a fraction of position value, in basis points (200 = 2%)
    pub fee_rate_bps: u32,

    /// Share of the field that gets its entry fee back, in basis points
    /// (5000 = top 50%)
    pub refund_fraction_bps: u32,

    /// Number of top standings whose performance is shown exactly (K)
    pub exact_disclosure_count: usize,

    /// Inclusive upper rank of each bucket below the exact tier
    pub bucket_boundaries: Vec<u32>,

    /// Maximum number of retained activity events
    pub feed_capacity: usize,

    /// Length of a daily tournament in seconds
    pub daily_duration_secs: u64,

    /// Length of a weekly tournament in seconds
    pub weekly_duration_secs: u64,

    /// Battle score gain within one tick that counts as a big win
    pub big_win_score_jump: f64,

    /// Fee gain (smallest currency unit) within one tick that counts as a big win
    pub big_win_fee_jump: i64,

    /// Prize pool share per finishing position, in basis points
    pub payout_shares_bps: Vec<u32>,

    /// Capacity of each tournament actor's inbox
    pub inbox_capacity: usize,

    /// How long an ended tournament keeps its actor before it is archived
    pub retention_secs: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            fee_rate_bps: 200,
            refund_fraction_bps: 5_000,
            exact_disclosure_count: 3,
            bucket_boundaries: vec![8, 20, 50, 100],
            feed_capacity: 10,
            daily_duration_secs: 24 * 60 * 60,
            weekly_duration_secs: 7 * 24 * 60 * 60,
            big_win_score_jump: 250.0,
            big_win_fee_jump: 10_000,
            // 40/20/10 for the podium, 3% each for 4th through 10th
            payout_shares_bps: vec![4_000, 2_000, 1_000, 300, 300, 300, 300, 300, 300, 300],
            inbox_capacity: 100,
            retention_secs: 24 * 60 * 60,
        }
    }
}

impl ArenaConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// Recognized variables:
    /// - `ARENA_FEE_RATE_BPS`
    /// - `ARENA_REFUND_FRACTION_BPS`
    /// - `ARENA_EXACT_DISCLOSURE`
    /// - `ARENA_BUCKET_BOUNDARIES` (comma separated, e.g. `8,20,50,100`)
    /// - `ARENA_FEED_CAPACITY`
    /// - `ARENA_DAILY_SECS` / `ARENA_WEEKLY_SECS`
    /// - `ARENA_BIG_WIN_SCORE_JUMP` / `ARENA_BIG_WIN_FEE_JUMP`
    /// - `ARENA_PAYOUT_SHARES_BPS` (comma separated)
    /// - `ARENA_RETENTION_SECS`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a list variable cannot be parsed or
    /// the resulting configuration fails [`ArenaConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            fee_rate_bps: parse_env_or("ARENA_FEE_RATE_BPS", defaults.fee_rate_bps),
            refund_fraction_bps: parse_env_or(
                "ARENA_REFUND_FRACTION_BPS",
                defaults.refund_fraction_bps,
            ),
            exact_disclosure_count: parse_env_or(
                "ARENA_EXACT_DISCLOSURE",
                defaults.exact_disclosure_count,
            ),
            bucket_boundaries: parse_list_env_or(
                "ARENA_BUCKET_BOUNDARIES",
                defaults.bucket_boundaries,
            )?,
            feed_capacity: parse_env_or("ARENA_FEED_CAPACITY", defaults.feed_capacity),
            daily_duration_secs: parse_env_or("ARENA_DAILY_SECS", defaults.daily_duration_secs),
            weekly_duration_secs: parse_env_or("ARENA_WEEKLY_SECS", defaults.weekly_duration_secs),
            big_win_score_jump: parse_env_or(
                "ARENA_BIG_WIN_SCORE_JUMP",
                defaults.big_win_score_jump,
            ),
            big_win_fee_jump: parse_env_or("ARENA_BIG_WIN_FEE_JUMP", defaults.big_win_fee_jump),
            payout_shares_bps: parse_list_env_or(
                "ARENA_PAYOUT_SHARES_BPS",
                defaults.payout_shares_bps,
            )?,
            inbox_capacity: defaults.inbox_capacity,
            retention_secs: parse_env_or("ARENA_RETENTION_SECS", defaults.retention_secs),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_rate_bps > BPS_DENOMINATOR {
            return Err(ConfigError::invalid(
                "ARENA_FEE_RATE_BPS",
                "Must be at most 10000 (100%)",
            ));
        }

        if self.refund_fraction_bps > BPS_DENOMINATOR {
            return Err(ConfigError::invalid(
                "ARENA_REFUND_FRACTION_BPS",
                "Must be at most 10000 (100%)",
            ));
        }

        if self.feed_capacity == 0 {
            return Err(ConfigError::invalid(
                "ARENA_FEED_CAPACITY",
                "Must be greater than 0",
            ));
        }

        if self.daily_duration_secs == 0 || self.weekly_duration_secs == 0 {
            return Err(ConfigError::invalid(
                "ARENA_DAILY_SECS",
                "Tournament durations must be greater than 0",
            ));
        }

        for (var, secs) in [
            ("ARENA_DAILY_SECS", self.daily_duration_secs),
            ("ARENA_WEEKLY_SECS", self.weekly_duration_secs),
            ("ARENA_RETENTION_SECS", self.retention_secs),
        ] {
            if secs > MAX_DURATION_SECS {
                return Err(ConfigError::invalid(
                    var,
                    format!("Must be at most {} seconds", MAX_DURATION_SECS),
                ));
            }
        }

        if let Some(&first) = self.bucket_boundaries.first()
            && (first as usize) <= self.exact_disclosure_count
        {
            return Err(ConfigError::invalid(
                "ARENA_BUCKET_BOUNDARIES",
                format!(
                    "First boundary ({}) must be above the exact disclosure count ({})",
                    first, self.exact_disclosure_count
                ),
            ));
        }

        if self.bucket_boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::invalid(
                "ARENA_BUCKET_BOUNDARIES",
                "Boundaries must be strictly increasing",
            ));
        }

        let share_total: u64 = self.payout_shares_bps.iter().map(|&s| u64::from(s)).sum();
        if share_total > u64::from(BPS_DENOMINATOR) {
            return Err(ConfigError::invalid(
                "ARENA_PAYOUT_SHARES_BPS",
                format!("Shares add up to {} bps, more than 10000", share_total),
            ));
        }

        if !self.big_win_score_jump.is_finite() || self.big_win_score_jump <= 0.0 {
            return Err(ConfigError::invalid(
                "ARENA_BIG_WIN_SCORE_JUMP",
                "Must be a positive number",
            ));
        }

        if self.big_win_fee_jump <= 0 {
            return Err(ConfigError::invalid(
                "ARENA_BIG_WIN_FEE_JUMP",
                "Must be greater than 0",
            ));
        }

        if self.inbox_capacity == 0 {
            return Err(ConfigError::invalid("inbox_capacity", "Must be greater than 0"));
        }

        Ok(())
    }

    /// Get the scheduled length of a tournament of the given type
    pub fn duration_for(&self, tournament_type: TournamentType) -> Duration {
        let secs = match tournament_type {
            TournamentType::Daily => self.daily_duration_secs,
            TournamentType::Weekly => self.weekly_duration_secs,
        };
        Self::bounded_duration(secs)
    }

    /// Grace period between an ended tournament and its archival
    pub fn retention(&self) -> Duration {
        Self::bounded_duration(self.retention_secs)
    }

    fn bounded_duration(secs: u64) -> Duration {
        Duration::seconds(i64::try_from(secs.min(MAX_DURATION_SECS)).unwrap_or(0))
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

impl ConfigError {
    fn invalid(var: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            var: var.to_string(),
            reason: reason.into(),
        }
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Helper to parse a comma separated environment variable with default fallback
fn parse_list_env_or(key: &str, default: Vec<u32>) -> Result<Vec<u32>, ConfigError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| ConfigError::invalid(key, format!("'{}' is not a whole number", part)))
        })
        .collect()
}
