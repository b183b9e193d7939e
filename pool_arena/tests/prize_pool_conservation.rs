//! Prize pool conservation tests for settlement payouts.
//!
//! Every split must pay out exactly the total prize pool: rounding dust and
//! shares nobody finished in end up with first place, never lost.

#![allow(clippy::unreadable_literal)]

mod common;

use common::{FakeFeed, manager, tournament_with_entrants};
use pool_arena::{ArenaConfig, tournament::PrizeStructure};
use proptest::prelude::*;

fn default_shares() -> Vec<u32> {
    ArenaConfig::default().payout_shares_bps
}

#[test]
fn test_full_podium_conservation() {
    let test_cases = vec![
        (324_000, 89), // live rewards card
        (100_000, 10),
        (99_999, 10),  // odd pool
        (7, 50),       // pool smaller than the number of paid places
        (1, 11),
    ];

    for (pool, entrants) in test_cases {
        let structure = PrizeStructure::from_shares(pool, &default_shares(), entrants);
        let payout_sum: i64 = structure.payouts.iter().sum();

        assert_eq!(
            pool, payout_sum,
            "{} entrants sharing {}: payouts sum to {}",
            entrants, pool, payout_sum
        );
        assert_eq!(structure.payouts.len(), 10);
    }
}

#[test]
fn test_short_field_conservation() {
    for entrants in 1..10 {
        let structure = PrizeStructure::from_shares(50_000, &default_shares(), entrants);
        let payout_sum: i64 = structure.payouts.iter().sum();

        assert_eq!(payout_sum, 50_000, "{} entrants", entrants);
        assert_eq!(structure.payouts.len(), entrants);
    }
}

#[test]
fn test_first_place_never_below_second() {
    for entrants in 2..30 {
        let structure = PrizeStructure::from_shares(12_345, &default_shares(), entrants);
        assert!(
            structure.payouts[0] >= structure.payouts[1],
            "payouts {:?}",
            structure.payouts
        );
    }
}

#[test]
fn test_empty_field_pays_nothing() {
    let structure = PrizeStructure::from_shares(50_000, &default_shares(), 0);
    assert!(structure.payouts.is_empty());
}

proptest! {
    #[test]
    fn prop_payouts_sum_to_pool(pool in 1i64..10_000_000_000, entrants in 1usize..500) {
        let structure = PrizeStructure::from_shares(pool, &default_shares(), entrants);
        prop_assert_eq!(structure.payouts.iter().sum::<i64>(), pool);
        prop_assert!(structure.payouts.iter().all(|&p| p >= 0));
    }

    #[test]
    fn prop_custom_shares_conserve(
        pool in 1i64..1_000_000,
        shares in prop::collection::vec(0u32..2_000, 0..5),
        entrants in 1usize..20,
    ) {
        let structure = PrizeStructure::from_shares(pool, &shares, entrants);
        prop_assert_eq!(structure.payouts.iter().sum::<i64>(), pool);
    }
}

#[tokio::test]
async fn test_settled_tournament_pays_entire_pool() {
    let manager = manager();
    let (tournament_id, entries) = tournament_with_entrants(&manager, 324_000, 37).await;
    manager.start_tournament(tournament_id).await.unwrap();

    let mut feed = FakeFeed::seeded(37);
    for entry in &entries {
        for _ in 0..3 {
            let current = manager.get_entry(entry.id).await.unwrap().performance;
            let tick = feed.tick(entry.id, &current);
            manager.submit_performance_tick(tick).await.unwrap();
        }
    }

    manager.end_tournament(tournament_id).await.unwrap();
    let report = manager.settlement(tournament_id).await.unwrap().unwrap();

    let fees: i64 = entries.iter().map(|e| e.entry_fee).sum();
    let pool = 324_000 + fees - report.refunded_fees;
    let paid: i64 = report.results.iter().map(|r| r.payout).sum();

    assert_eq!(report.prize_structure.total_pool, pool);
    assert_eq!(paid, pool);
    assert_eq!(report.results.iter().filter(|r| r.refund_eligible).count(), 19);
}
