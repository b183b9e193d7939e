//! Position data models.

use super::errors::PositionError;
use crate::participant::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Position ID type
pub type PositionId = i64;

/// Two-token liquidity pool pair, e.g. `ETH/USDC`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PoolPair {
    base: String,
    quote: String,
}

impl PoolPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }
}

impl fmt::Display for PoolPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for PoolPair {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((base, quote))
                if !base.trim().is_empty()
                    && !quote.trim().is_empty()
                    && !quote.contains('/') =>
            {
                Ok(Self::new(base.trim(), quote.trim()))
            }
            _ => Err(PositionError::InvalidPool(s.to_string())),
        }
    }
}

impl TryFrom<String> for PoolPair {
    type Error = PositionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PoolPair> for String {
    fn from(value: PoolPair) -> Self {
        value.to_string()
    }
}

/// Risk tier of the underlying pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Price range chosen when the position was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStrategy {
    /// ±5% around the entry price
    Tight,
    /// ±15% around the entry price
    Balanced,
    /// ±30% around the entry price
    Wide,
}

impl RangeStrategy {
    /// Half-width of the price range in percent
    pub fn width_pct(self) -> u32 {
        match self {
            RangeStrategy::Tight => 5,
            RangeStrategy::Balanced => 15,
            RangeStrategy::Wide => 30,
        }
    }
}

/// LP position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub owner: ParticipantId,
    pub pool: PoolPair,
    /// Position value in the smallest currency unit
    pub value: i64,
    /// Estimated APY in percent
    pub apy_pct: f64,
    pub risk: RiskTier,
    pub strategy: RangeStrategy,
    /// Whether the current price sits inside the position's range
    pub in_range: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register a new position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPosition {
    pub owner: ParticipantId,
    pub pool: PoolPair,
    pub value: i64,
    pub apy_pct: f64,
    pub risk: RiskTier,
    pub strategy: RangeStrategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_pair_parse() {
        let pair: PoolPair = "WBTC/ETH".parse().unwrap();
        assert_eq!(pair.base(), "WBTC");
        assert_eq!(pair.quote(), "ETH");
        assert_eq!(pair.to_string(), "WBTC/ETH");
    }

    #[test]
    fn test_pool_pair_rejects_malformed() {
        assert!("ETH".parse::<PoolPair>().is_err());
        assert!("ETH/".parse::<PoolPair>().is_err());
        assert!("A/B/C".parse::<PoolPair>().is_err());
    }

    #[test]
    fn test_pool_pair_serializes_as_string() {
        let json = serde_json::to_string(&PoolPair::new("PEPE", "ETH")).unwrap();
        assert_eq!(json, "\"PEPE/ETH\"");

        let back: PoolPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PoolPair::new("PEPE", "ETH"));
    }

    #[test]
    fn test_range_widths() {
        assert_eq!(RangeStrategy::Tight.width_pct(), 5);
        assert_eq!(RangeStrategy::Balanced.width_pct(), 15);
        assert_eq!(RangeStrategy::Wide.width_pct(), 30);
    }
}
