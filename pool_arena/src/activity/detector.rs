//! Derives activity events from ranking deltas and entry changes.

use super::models::{ActivityEvent, ActivityKind};
use crate::{
    config::ArenaConfig,
    participant::ParticipantId,
    ranking::{DisclosureTier, RankMovement, RankedStanding},
    tournament::models::{Entry, PerformanceSnapshot, TournamentId},
};
use chrono::{DateTime, Utc};

/// Stateless event detector with configured big-win thresholds
#[derive(Debug, Clone, Copy)]
pub struct ActivityDetector {
    big_win_score_jump: f64,
    big_win_fee_jump: i64,
}

impl ActivityDetector {
    pub fn new(big_win_score_jump: f64, big_win_fee_jump: i64) -> Self {
        Self {
            big_win_score_jump,
            big_win_fee_jump,
        }
    }

    pub fn from_config(config: &ArenaConfig) -> Self {
        Self::new(config.big_win_score_jump, config.big_win_fee_jump)
    }

    /// Events for standings that improved since the previous recomputation.
    ///
    /// Every climb yields a `RankChange`; a climb into first place also
    /// yields a `Milestone`.
    pub fn rank_events(
        &self,
        tournament_id: TournamentId,
        standings: &[RankedStanding],
        at: DateTime<Utc>,
    ) -> Vec<ActivityEvent> {
        let mut events = Vec::new();

        for standing in standings {
            let RankMovement::Up(places) = standing.movement() else {
                continue;
            };

            events.push(ActivityEvent::new(
                ActivityKind::RankChange,
                tournament_id,
                standing.participant.clone(),
                f64::from(places),
                at,
            ));

            if standing.rank == 1 {
                events.push(ActivityEvent::new(
                    ActivityKind::Milestone,
                    tournament_id,
                    standing.participant.clone(),
                    1.0,
                    at,
                ));
            }
        }

        events
    }

    /// Big win event when one tick moved fees or score past the threshold.
    ///
    /// A fee jump takes precedence; its magnitude is the fee gain. The gain
    /// is only published for a subject in the exact tier, a bucketed subject
    /// gets magnitude 0.
    pub fn tick_event(
        &self,
        tournament_id: TournamentId,
        participant: &ParticipantId,
        before: &PerformanceSnapshot,
        after: &PerformanceSnapshot,
        tier: DisclosureTier,
        at: DateTime<Utc>,
    ) -> Option<ActivityEvent> {
        let fee_jump = after.fees_earned.saturating_sub(before.fees_earned);
        let score_jump = after.battle_score - before.battle_score;

        let magnitude = if fee_jump > self.big_win_fee_jump {
            fee_jump as f64
        } else if score_jump > self.big_win_score_jump {
            score_jump
        } else {
            return None;
        };

        let magnitude = match tier {
            DisclosureTier::Exact => magnitude,
            DisclosureTier::Bucketed => 0.0,
        };

        Some(ActivityEvent::new(
            ActivityKind::BigWin,
            tournament_id,
            participant.clone(),
            magnitude,
            at,
        ))
    }

    /// Event announcing a new entry, stamped at publication time `at`
    pub fn join_event(&self, entry: &Entry, at: DateTime<Utc>) -> ActivityEvent {
        ActivityEvent::new(
            ActivityKind::NewJoin,
            entry.tournament_id,
            entry.participant.clone(),
            entry.entry_fee as f64,
            at,
        )
    }
}

impl Default for ActivityDetector {
    fn default() -> Self {
        Self::from_config(&ArenaConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::Disclosure;
    use uuid::Uuid;

    fn standing(rank: u32, previous_rank: Option<u32>) -> RankedStanding {
        RankedStanding {
            rank,
            previous_rank,
            entry_id: Uuid::new_v4(),
            participant: format!("0x{}", rank).into(),
            pool: "SOL/USDC".parse().unwrap(),
            disclosure: Disclosure::Exact {
                performance: PerformanceSnapshot::default(),
            },
        }
    }

    #[test]
    fn test_only_improvements_emit_rank_change() {
        let detector = ActivityDetector::default();
        let standings = vec![standing(2, Some(5)), standing(3, Some(2)), standing(4, None)];

        let events = detector.rank_events(1, &standings, Utc::now());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ActivityKind::RankChange);
        assert_eq!(events[0].magnitude, 3.0);
    }

    #[test]
    fn test_taking_first_place_is_a_milestone() {
        let detector = ActivityDetector::default();
        let events = detector.rank_events(1, &[standing(1, Some(2))], Utc::now());

        let kinds: Vec<ActivityKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ActivityKind::RankChange, ActivityKind::Milestone]);
    }

    #[test]
    fn test_holding_first_place_is_quiet() {
        let detector = ActivityDetector::default();
        assert!(detector.rank_events(1, &[standing(1, Some(1))], Utc::now()).is_empty());
    }

    #[test]
    fn test_big_win_on_fee_jump() {
        let detector = ActivityDetector::new(250.0, 10_000);
        let before = PerformanceSnapshot::default();
        let after = PerformanceSnapshot {
            fees_earned: 23_450,
            ..before
        };

        let event = detector
            .tick_event(1, &"0x7F3...A2E8".into(), &before, &after, DisclosureTier::Exact, Utc::now())
            .unwrap();
        assert_eq!(event.kind, ActivityKind::BigWin);
        assert_eq!(event.magnitude, 23_450.0);
    }

    #[test]
    fn test_big_win_on_score_jump() {
        let detector = ActivityDetector::new(250.0, 10_000);
        let before = PerformanceSnapshot {
            battle_score: 2_000.0,
            ..PerformanceSnapshot::default()
        };
        let after = PerformanceSnapshot {
            battle_score: 2_847.0,
            ..before
        };

        let event = detector
            .tick_event(1, &"0x7F3...A2E8".into(), &before, &after, DisclosureTier::Exact, Utc::now())
            .unwrap();
        assert_eq!(event.magnitude, 847.0);
    }

    #[test]
    fn test_bucketed_big_win_hides_the_jump() {
        let detector = ActivityDetector::new(250.0, 10_000);
        let before = PerformanceSnapshot::default();
        let after = PerformanceSnapshot {
            fees_earned: 87_654,
            battle_score: 900.0,
            ..before
        };

        let event = detector
            .tick_event(1, &"0xB0B".into(), &before, &after, DisclosureTier::Bucketed, Utc::now())
            .unwrap();
        assert_eq!(event.kind, ActivityKind::BigWin);
        assert_eq!(event.magnitude, 0.0);
    }

    #[test]
    fn test_join_event_uses_publication_time() {
        let detector = ActivityDetector::default();
        let published = Utc::now();
        let entry = Entry {
            id: Uuid::new_v4(),
            tournament_id: 3,
            participant: "0xA11CE".into(),
            position_id: 1,
            pool: "SOL/USDC".parse().unwrap(),
            entered_at: published - chrono::Duration::seconds(30),
            entry_fee: 8_500,
            refund_eligible: None,
            performance: PerformanceSnapshot::default(),
            last_tick_at: None,
            disqualified: false,
        };

        let event = detector.join_event(&entry, published);
        assert_eq!(event.kind, ActivityKind::NewJoin);
        assert_eq!(event.occurred_at, published);
        assert_eq!(event.magnitude, 8_500.0);
    }

    #[test]
    fn test_small_moves_are_not_big_wins() {
        let detector = ActivityDetector::new(250.0, 10_000);
        let before = PerformanceSnapshot::default();
        let after = PerformanceSnapshot {
            fees_earned: 10_000,
            battle_score: 250.0,
            ..before
        };

        assert!(detector
            .tick_event(1, &"0x7F3...A2E8".into(), &before, &after, DisclosureTier::Exact, Utc::now())
            .is_none());
    }
}
