//! Bounded activity feed.

use super::models::ActivityEvent;
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Capacity-bounded event log, newest first
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    capacity: usize,
    events: VecDeque<ActivityEvent>,
}

impl ActivityFeed {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity),
        }
    }

    /// Prepend an event, evicting the oldest ones past capacity.
    ///
    /// An event stamped earlier than the current newest takes the newest
    /// timestamp, keeping the feed ordered by time as well as by push.
    pub fn push(&mut self, mut event: ActivityEvent) {
        if let Some(newest) = self.events.front()
            && event.occurred_at < newest.occurred_at
        {
            event.occurred_at = newest.occurred_at;
        }

        self.events.push_front(event);
        self.events.truncate(self.capacity);
    }

    /// Up to `n` events, most recent first
    pub fn recent(&self, n: usize) -> Vec<ActivityEvent> {
        self.events.iter().take(n).cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Activity feed shared between tournament actors and readers.
///
/// Readers get a copy taken under the read lock.
#[derive(Debug)]
pub struct ActivityLog {
    feed: RwLock<ActivityFeed>,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            feed: RwLock::new(ActivityFeed::new(capacity)),
        }
    }

    pub async fn push(&self, event: ActivityEvent) {
        log::debug!(
            "Activity {} for {} in tournament {}",
            event.kind,
            event.participant,
            event.tournament_id
        );
        self.feed.write().await.push(event);
    }

    /// Push events in order, so the last one ends up newest
    pub async fn push_all(&self, events: Vec<ActivityEvent>) {
        if events.is_empty() {
            return;
        }

        let mut feed = self.feed.write().await;
        for event in events {
            feed.push(event);
        }
    }

    pub async fn recent(&self, n: usize) -> Vec<ActivityEvent> {
        self.feed.read().await.recent(n)
    }

    pub async fn len(&self) -> usize {
        self.feed.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.feed.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::models::ActivityKind;
    use chrono::{Duration, TimeZone, Utc};

    fn event(n: i64) -> ActivityEvent {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        ActivityEvent::new(
            ActivityKind::RankChange,
            1,
            format!("0x{:02}", n).into(),
            n as f64,
            base + Duration::seconds(n),
        )
    }

    #[test]
    fn test_eleventh_push_evicts_oldest() {
        let mut feed = ActivityFeed::new(10);
        for n in 1..=11 {
            feed.push(event(n));
        }

        assert_eq!(feed.len(), 10);

        let recent = feed.recent(10);
        let magnitudes: Vec<f64> = recent.iter().map(|e| e.magnitude).collect();
        let expected: Vec<f64> = (2..=11).rev().map(|n| n as f64).collect();
        assert_eq!(magnitudes, expected);
    }

    #[test]
    fn test_recent_returns_fewer_when_short() {
        let mut feed = ActivityFeed::new(10);
        feed.push(event(1));
        feed.push(event(2));

        let recent = feed.recent(5);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].magnitude, 2.0);
    }

    #[test]
    fn test_recent_zero() {
        let mut feed = ActivityFeed::new(3);
        feed.push(event(1));
        assert!(feed.recent(0).is_empty());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut feed = ActivityFeed::new(0);
        feed.push(event(1));
        feed.push(event(2));
        assert_eq!(feed.capacity(), 1);
        assert_eq!(feed.recent(5)[0].magnitude, 2.0);
    }

    #[test]
    fn test_late_stamped_event_is_clamped() {
        let mut feed = ActivityFeed::new(10);
        feed.push(event(5));
        feed.push(event(2));

        let recent = feed.recent(2);
        assert_eq!(recent[0].magnitude, 2.0);
        assert_eq!(recent[0].occurred_at, recent[1].occurred_at);
        assert!(recent.windows(2).all(|w| w[0].occurred_at >= w[1].occurred_at));
    }

    #[tokio::test]
    async fn test_log_push_all_keeps_order() {
        let log = ActivityLog::new(10);
        log.push_all(vec![event(1), event(2), event(3)]).await;
        log.push(event(4)).await;

        let recent = log.recent(10).await;
        let magnitudes: Vec<f64> = recent.iter().map(|e| e.magnitude).collect();
        assert_eq!(magnitudes, vec![4.0, 3.0, 2.0, 1.0]);
        assert_eq!(log.len().await, 4);
    }
}
