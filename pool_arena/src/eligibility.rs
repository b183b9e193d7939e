//! Eligibility and entry terms.
//!
//! Pure functions deciding whether a position may battle, what it costs to
//! enter, and whether the fee comes back at settlement. The tournament actor
//! applies them; nothing here touches shared state.

use crate::{
    config::BPS_DENOMINATOR,
    position::Position,
    tournament::models::Entry,
};
use serde::{Deserialize, Serialize};

/// Why a position may not enter a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleReason {
    /// The price left the position's range
    OutOfRange,
    /// The position is already entered in the tournament
    AlreadyEntered,
}

impl std::fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IneligibleReason::OutOfRange => write!(f, "position is out of range"),
            IneligibleReason::AlreadyEntered => write!(f, "position already entered"),
        }
    }
}

/// Eligibility verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    Ineligible(IneligibleReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

/// Decide whether `position` may enter a tournament holding `entries`
pub fn check_eligibility<'a>(
    position: &Position,
    entries: impl IntoIterator<Item = &'a Entry>,
) -> Eligibility {
    if !position.in_range {
        return Eligibility::Ineligible(IneligibleReason::OutOfRange);
    }

    if entries.into_iter().any(|e| e.position_id == position.id) {
        return Eligibility::Ineligible(IneligibleReason::AlreadyEntered);
    }

    Eligibility::Eligible
}

/// Entry fee for a position, rounded half-up to the smallest currency unit
pub fn compute_entry_fee(position_value: i64, fee_rate_bps: u32) -> i64 {
    let scaled = i128::from(position_value) * i128::from(fee_rate_bps);
    let denominator = i128::from(BPS_DENOMINATOR);
    let half = denominator / 2;

    let fee = if scaled >= 0 {
        (scaled + half) / denominator
    } else {
        -((-scaled + half) / denominator)
    };

    fee as i64
}

/// Refund decision made at settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundDecision {
    pub refund_eligible: bool,
    /// Worst rank that still gets the fee back
    pub cutoff_rank: u32,
}

/// Worst rank inside the refunded fraction of the field.
///
/// `ceil(total * fraction)`; with the default 50% that is `ceil(total / 2)`.
pub fn refund_cutoff(total_entrants: u32, refund_fraction_bps: u32) -> u32 {
    let scaled = u64::from(total_entrants) * u64::from(refund_fraction_bps);
    scaled.div_ceil(u64::from(BPS_DENOMINATOR)) as u32
}

/// Decide the refund for a final rank.
///
/// Total over all inputs: ranks outside `1..=total_entrants` are never
/// refunded.
pub fn settle(final_rank: u32, total_entrants: u32, refund_fraction_bps: u32) -> RefundDecision {
    let cutoff_rank = refund_cutoff(total_entrants, refund_fraction_bps);
    let in_field = final_rank >= 1 && final_rank <= total_entrants;

    RefundDecision {
        refund_eligible: in_field && final_rank <= cutoff_rank,
        cutoff_rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{RangeStrategy, RiskTier};
    use crate::tournament::models::PerformanceSnapshot;
    use chrono::Utc;
    use proptest::prelude::*;
    use uuid::Uuid;

    const HALF: u32 = 5_000;

    fn position(id: i64, in_range: bool) -> Position {
        Position {
            id,
            owner: "0x5A7...B9F1".into(),
            pool: "PEPE/ETH".parse().unwrap(),
            value: 145_000,
            apy_pct: 45.2,
            risk: RiskTier::High,
            strategy: RangeStrategy::Tight,
            in_range,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn entry_for(position_id: i64) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            tournament_id: 1,
            participant: "0x5A7...B9F1".into(),
            position_id,
            pool: "PEPE/ETH".parse().unwrap(),
            entered_at: Utc::now(),
            entry_fee: 2_900,
            refund_eligible: None,
            performance: PerformanceSnapshot::default(),
            last_tick_at: None,
            disqualified: false,
        }
    }

    #[test]
    fn test_in_range_position_is_eligible() {
        let entries = vec![entry_for(2)];
        assert_eq!(check_eligibility(&position(1, true), &entries), Eligibility::Eligible);
    }

    #[test]
    fn test_out_of_range_position_is_ineligible() {
        assert_eq!(
            check_eligibility(&position(1, false), &Vec::<Entry>::new()),
            Eligibility::Ineligible(IneligibleReason::OutOfRange)
        );
    }

    #[test]
    fn test_out_of_range_wins_over_already_entered() {
        let entries = vec![entry_for(1)];
        assert_eq!(
            check_eligibility(&position(1, false), &entries),
            Eligibility::Ineligible(IneligibleReason::OutOfRange)
        );
    }

    #[test]
    fn test_already_entered_position() {
        let entries = vec![entry_for(1)];
        assert_eq!(
            check_eligibility(&position(1, true), &entries),
            Eligibility::Ineligible(IneligibleReason::AlreadyEntered)
        );
    }

    #[test]
    fn test_entry_fee_two_percent() {
        // $4,250.00 at 2% is $85.00
        assert_eq!(compute_entry_fee(425_000, 200), 8_500);
        assert_eq!(compute_entry_fee(0, 200), 0);
    }

    #[test]
    fn test_entry_fee_rounds_half_up() {
        // 25 * 2% = 0.5 -> 1
        assert_eq!(compute_entry_fee(25, 200), 1);
        // 24 * 2% = 0.48 -> 0
        assert_eq!(compute_entry_fee(24, 200), 0);
        // 75 * 2% = 1.5 -> 2
        assert_eq!(compute_entry_fee(75, 200), 2);
    }

    #[test]
    fn test_refund_cutoff_is_ceiling_of_half() {
        assert_eq!(refund_cutoff(89, HALF), 45);
        assert_eq!(refund_cutoff(10, HALF), 5);
        assert_eq!(refund_cutoff(1, HALF), 1);
        assert_eq!(refund_cutoff(0, HALF), 0);
    }

    #[test]
    fn test_settle_eighty_nine_entrants() {
        assert!(settle(44, 89, HALF).refund_eligible);
        assert!(settle(45, 89, HALF).refund_eligible);
        assert!(!settle(46, 89, HALF).refund_eligible);
        assert_eq!(settle(46, 89, HALF).cutoff_rank, 45);
    }

    #[test]
    fn test_settle_outside_field() {
        assert!(!settle(0, 10, HALF).refund_eligible);
        assert!(!settle(11, 10, HALF).refund_eligible);
    }

    #[test]
    fn test_eligibility_serialization() {
        let json = serde_json::to_string(&Eligibility::Ineligible(IneligibleReason::OutOfRange))
            .unwrap();
        assert_eq!(json, r#"{"status":"ineligible","reason":"out_of_range"}"#);
    }

    proptest! {
        #[test]
        fn prop_settle_matches_ceiling_rule(total in 1u32..5_000, pick in 0u32..5_000) {
            let rank = pick % total + 1;
            let decision = settle(rank, total, HALF);
            prop_assert_eq!(decision.refund_eligible, rank <= total.div_ceil(2));
        }

        #[test]
        fn prop_settle_is_deterministic(total in 1u32..1_000, rank in 1u32..1_000) {
            prop_assert_eq!(settle(rank, total, HALF), settle(rank, total, HALF));
        }

        #[test]
        fn prop_fee_never_exceeds_value(value in 0i64..1_000_000_000_000, bps in 0u32..=10_000) {
            let fee = compute_entry_fee(value, bps);
            prop_assert!(fee >= 0);
            prop_assert!(fee <= value);
        }
    }
}
