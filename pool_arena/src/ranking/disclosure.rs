//! Disclosure policy for ranked standings.

use crate::config::ArenaConfig;
use serde::{Deserialize, Serialize};

/// Visibility level of a standing's performance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclosureTier {
    /// Exact values are readable
    Exact,
    /// Only bucket membership is readable
    Bucketed,
}

/// Qualitative average performance of a bucket.
///
/// Deliberately coarse: a bucket never reveals a numeric average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLabel {
    UltraHigh,
    VeryHigh,
    High,
    Medium,
    Low,
    /// Both gains and losses in the bucket
    Mixed,
    /// Only losses in the bucket
    Negative,
}

impl PerformanceLabel {
    /// Label a group of PnL percentages
    pub fn from_pnl_pcts(pcts: &[f64]) -> Self {
        let gains = pcts.iter().filter(|&&p| p > 0.0).count();
        let losses = pcts.iter().filter(|&&p| p < 0.0).count();

        if losses > 0 {
            return if gains > 0 {
                PerformanceLabel::Mixed
            } else {
                PerformanceLabel::Negative
            };
        }

        if pcts.is_empty() {
            return PerformanceLabel::Low;
        }

        let average = pcts.iter().sum::<f64>() / pcts.len() as f64;
        match average {
            a if a >= 100.0 => PerformanceLabel::UltraHigh,
            a if a >= 50.0 => PerformanceLabel::VeryHigh,
            a if a >= 20.0 => PerformanceLabel::High,
            a if a >= 5.0 => PerformanceLabel::Medium,
            _ => PerformanceLabel::Low,
        }
    }
}

/// Summary of one rank-range bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankBucket {
    pub index: usize,
    pub first_rank: u32,
    pub last_rank: u32,
    pub size: usize,
    pub label: PerformanceLabel,
}

/// Which ranks are shown exactly and how the rest are grouped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisclosurePolicy {
    exact_count: u32,
    boundaries: Vec<u32>,
}

impl DisclosurePolicy {
    /// `boundaries` are the inclusive upper ranks of each bucket; ranks past
    /// the last boundary share one open-ended bucket.
    pub fn new(exact_count: usize, boundaries: Vec<u32>) -> Self {
        Self {
            exact_count: u32::try_from(exact_count).unwrap_or(u32::MAX),
            boundaries,
        }
    }

    pub fn from_config(config: &ArenaConfig) -> Self {
        Self::new(config.exact_disclosure_count, config.bucket_boundaries.clone())
    }

    pub fn exact_count(&self) -> u32 {
        self.exact_count
    }

    pub fn tier_for(&self, rank: u32) -> DisclosureTier {
        if rank <= self.exact_count {
            DisclosureTier::Exact
        } else {
            DisclosureTier::Bucketed
        }
    }

    /// Bucket holding `rank`, or `None` for the exact tier
    pub fn bucket_index(&self, rank: u32) -> Option<usize> {
        if self.tier_for(rank) == DisclosureTier::Exact {
            return None;
        }

        Some(
            self.boundaries
                .iter()
                .position(|&upper| rank <= upper)
                .unwrap_or(self.boundaries.len()),
        )
    }

    /// First rank and optional last rank of a bucket
    pub fn bucket_bounds(&self, index: usize) -> (u32, Option<u32>) {
        let floor = self.exact_count.saturating_add(1);
        let first = match index {
            0 => floor,
            i => self
                .boundaries
                .get(i - 1)
                .map_or(floor, |&prev| prev.saturating_add(1).max(floor)),
        };

        (first, self.boundaries.get(index).copied())
    }
}
