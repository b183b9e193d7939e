//! Tournament actor implementation with async message handling.

use super::{
    errors::{TickRejection, TournamentError, TournamentResult},
    messages::TournamentMessage,
    models::{
        Entry, EntryId, LifecycleSignal, PerformanceSnapshot, PerformanceTick, PrizeStructure,
        SettledEntry, SettlementReport, TournamentConfig, TournamentId, TournamentInfo,
        TournamentState,
    },
};
use crate::{
    activity::{ActivityDetector, ActivityEvent, ActivityLog},
    config::{ArenaConfig, MAX_AMOUNT},
    eligibility::{self, Eligibility},
    participant::{ParticipantId, ParticipantRegistry},
    position::{PositionId, PositionRegistry},
    ranking::{DisclosurePolicy, DisclosureTier, Leaderboard, RankingEngine},
};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

/// Registries and rules shared by every tournament
#[derive(Debug, Clone)]
pub struct ArenaContext {
    pub rules: Arc<ArenaConfig>,
    pub positions: Arc<PositionRegistry>,
    pub participants: Arc<ParticipantRegistry>,
    pub activity: Arc<ActivityLog>,
}

impl ArenaContext {
    pub fn new(rules: ArenaConfig) -> Self {
        let activity = ActivityLog::new(rules.feed_capacity);
        Self {
            rules: Arc::new(rules),
            positions: Arc::new(PositionRegistry::new()),
            participants: Arc::new(ParticipantRegistry::new()),
            activity: Arc::new(activity),
        }
    }
}

/// Tournament actor handle for sending messages and reading published state
#[derive(Clone)]
pub struct TournamentHandle {
    sender: mpsc::Sender<TournamentMessage>,
    tournament_id: TournamentId,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    standings: watch::Receiver<Arc<Leaderboard>>,
    state: watch::Receiver<TournamentState>,
}

impl TournamentHandle {
    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Last published state
    pub fn state(&self) -> TournamentState {
        *self.state.borrow()
    }

    /// Last published leaderboard
    pub fn standings(&self) -> Arc<Leaderboard> {
        Arc::clone(&self.standings.borrow())
    }

    /// Send a message to the tournament
    pub async fn send(&self, message: TournamentMessage) -> TournamentResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| TournamentError::Unavailable(self.tournament_id))
    }

    /// Queue a message without waiting for inbox space
    pub fn try_send(&self, message: TournamentMessage) -> TournamentResult<()> {
        self.sender
            .try_send(message)
            .map_err(|_| TournamentError::Unavailable(self.tournament_id))
    }

    /// Send a message and wait for its reply
    pub async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> TournamentMessage,
    ) -> TournamentResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await
            .map_err(|_| TournamentError::Unavailable(self.tournament_id))
    }
}

/// Actor owning a single tournament.
///
/// All entries and rankings of the tournament are mutated only here, one
/// message at a time. Standings and state are published through watch
/// channels as immutable snapshots.
pub struct TournamentActor {
    id: TournamentId,
    config: TournamentConfig,
    state: TournamentState,
    ends_at: DateTime<Utc>,

    /// Entries in join order; never removed
    entries: Vec<Entry>,
    entry_index: HashMap<EntryId, usize>,

    /// Entry fees charged so far
    collected_fees: i64,

    engine: RankingEngine,
    detector: ActivityDetector,
    leaderboard: Arc<Leaderboard>,
    settlement: Option<SettlementReport>,

    context: ArenaContext,
    inbox: mpsc::Receiver<TournamentMessage>,
    standings_tx: watch::Sender<Arc<Leaderboard>>,
    state_tx: watch::Sender<TournamentState>,
}

impl TournamentActor {
    /// Create a new tournament actor
    ///
    /// # Returns
    ///
    /// * `(TournamentActor, TournamentHandle)` - Actor and handle for sending messages
    ///
    /// # Errors
    ///
    /// Returns [`TournamentError::InvalidConfig`] if the end time falls
    /// outside the representable calendar.
    pub fn new(
        id: TournamentId,
        config: TournamentConfig,
        context: ArenaContext,
    ) -> TournamentResult<(Self, TournamentHandle)> {
        let starts_at = config.starts_at;
        let ends_at = starts_at
            .checked_add_signed(context.rules.duration_for(config.tournament_type))
            .ok_or_else(|| {
                TournamentError::InvalidConfig(format!(
                    "Tournament starting at {} would end past the supported calendar",
                    starts_at.to_rfc3339()
                ))
            })?;

        let (sender, inbox) = mpsc::channel(context.rules.inbox_capacity);

        let leaderboard = Arc::new(Leaderboard::empty(id));
        let (standings_tx, standings_rx) = watch::channel(Arc::clone(&leaderboard));
        let (state_tx, state_rx) = watch::channel(TournamentState::Upcoming);

        let handle = TournamentHandle {
            sender,
            tournament_id: id,
            starts_at,
            ends_at,
            standings: standings_rx,
            state: state_rx,
        };

        let actor = Self {
            id,
            config,
            state: TournamentState::Upcoming,
            ends_at,
            entries: Vec::new(),
            entry_index: HashMap::new(),
            collected_fees: 0,
            engine: RankingEngine::new(DisclosurePolicy::from_config(&context.rules)),
            detector: ActivityDetector::from_config(&context.rules),
            leaderboard,
            settlement: None,
            context,
            inbox,
            standings_tx,
            state_tx,
        };

        Ok((actor, handle))
    }

    /// Run the tournament actor event loop
    pub async fn run(mut self) {
        log::info!("Tournament {} '{}' open", self.id, self.config.title);

        while let Some(message) = self.inbox.recv().await {
            if !self.handle_message(message).await {
                break;
            }
        }

        log::info!("Tournament {} '{}' closed", self.id, self.config.title);
    }

    /// Handle a message, returning `false` once the actor should stop
    async fn handle_message(&mut self, message: TournamentMessage) -> bool {
        match message {
            TournamentMessage::Join {
                participant,
                position_id,
                response,
            } => {
                let result = self.handle_join(participant, position_id).await;
                let joined = result.as_ref().ok().cloned();
                let _ = response.send(result);

                if let Some(entry) = joined {
                    let mut events = vec![self.detector.join_event(&entry, Utc::now())];
                    if self.state == TournamentState::Live {
                        events.extend(self.recompute(Utc::now()));
                    }
                    self.context.activity.push_all(events).await;
                }
            }

            TournamentMessage::CheckEligibility {
                position_id,
                response,
            } => {
                let result = self.check_eligibility(position_id).await;
                let _ = response.send(result);
            }

            TournamentMessage::SubmitTick { tick, response } => {
                let result = self.apply_tick(&tick);
                let applied = result.as_ref().ok().cloned();

                match response {
                    Some(response) => {
                        let _ = response.send(result.map(|_| ()));
                    }
                    None => {
                        if let Err(e) = result {
                            log::debug!("Tournament {}: dropped tick: {}", self.id, e);
                        }
                    }
                }

                if let Some((participant, before)) = applied {
                    let now = Utc::now();
                    let rank_events = self.recompute(now);

                    // Tier of the subject after this tick decides whether the jump is shown
                    let tier = self
                        .leaderboard
                        .standing_for_entry(tick.entry_id)
                        .map_or(DisclosureTier::Bucketed, |standing| standing.tier());

                    let mut events: Vec<ActivityEvent> = self
                        .detector
                        .tick_event(self.id, &participant, &before, &tick.snapshot, tier, now)
                        .into_iter()
                        .collect();
                    events.extend(rank_events);
                    self.context.activity.push_all(events).await;
                }
            }

            TournamentMessage::Disqualify { position_id } => {
                self.handle_disqualify(position_id).await;
            }

            TournamentMessage::Transition { signal, response } => {
                let result = self.handle_transition(signal).await;
                let _ = response.send(result);
            }

            TournamentMessage::GetInfo { response } => {
                let _ = response.send(self.info(Utc::now()));
            }

            TournamentMessage::GetEntry { entry_id, response } => {
                let entry = self
                    .entry_index
                    .get(&entry_id)
                    .map(|&idx| self.entries[idx].clone());
                let _ = response.send(entry);
            }

            TournamentMessage::GetSettlement { response } => {
                let _ = response.send(self.settlement.clone());
            }

            TournamentMessage::Close => return false,
        }

        true
    }

    async fn handle_join(
        &mut self,
        participant: ParticipantId,
        position_id: PositionId,
    ) -> TournamentResult<Entry> {
        if !self.state.accepts_entries() {
            return Err(TournamentError::TournamentClosed);
        }

        let position = self
            .context
            .positions
            .get(position_id)
            .await
            .map_err(|_| TournamentError::PositionNotFound(position_id))?;

        if position.owner != participant {
            return Err(TournamentError::PositionNotOwned(position_id));
        }

        if let Eligibility::Ineligible(reason) =
            eligibility::check_eligibility(&position, &self.entries)
        {
            return Err(TournamentError::NotEligible(reason));
        }

        if self.entries.iter().any(|e| e.participant == participant) {
            return Err(TournamentError::DuplicateEntry);
        }

        let entry_fee = eligibility::compute_entry_fee(position.value, self.context.rules.fee_rate_bps);
        let collected_fees = self
            .collected_fees
            .checked_add(entry_fee)
            .filter(|&fees| {
                self.config
                    .prize_pool
                    .checked_add(fees)
                    .is_some_and(|gross| gross <= MAX_AMOUNT)
            })
            .ok_or(TournamentError::PrizePoolFull)?;
        let entry = Entry {
            id: Uuid::new_v4(),
            tournament_id: self.id,
            participant,
            position_id,
            pool: position.pool,
            entered_at: Utc::now(),
            entry_fee,
            refund_eligible: None,
            performance: PerformanceSnapshot::default(),
            last_tick_at: None,
            disqualified: false,
        };

        self.context.participants.ensure(&entry.participant).await;

        self.collected_fees = collected_fees;
        self.entry_index.insert(entry.id, self.entries.len());
        self.entries.push(entry.clone());

        log::info!(
            "Tournament {}: {} entered position {} (fee {})",
            self.id,
            entry.participant,
            position_id,
            entry_fee
        );

        Ok(entry)
    }

    async fn check_eligibility(&self, position_id: PositionId) -> TournamentResult<Eligibility> {
        if !self.state.accepts_entries() {
            return Err(TournamentError::TournamentClosed);
        }

        let position = self
            .context
            .positions
            .get(position_id)
            .await
            .map_err(|_| TournamentError::PositionNotFound(position_id))?;

        Ok(eligibility::check_eligibility(&position, &self.entries))
    }

    /// Apply a tick, returning the participant and the snapshot it replaced
    fn apply_tick(
        &mut self,
        tick: &PerformanceTick,
    ) -> TournamentResult<(ParticipantId, PerformanceSnapshot)> {
        match self.state {
            TournamentState::Upcoming => return Err(TournamentError::NotStarted),
            TournamentState::Ended => return Err(TournamentError::TournamentClosed),
            TournamentState::Live => {}
        }

        let idx = *self
            .entry_index
            .get(&tick.entry_id)
            .ok_or(TournamentError::EntryNotFound(tick.entry_id))?;
        let entry = &mut self.entries[idx];

        if entry.disqualified {
            return Err(TournamentError::NotEligible(
                eligibility::IneligibleReason::OutOfRange,
            ));
        }

        if !tick.snapshot.is_finite() {
            return Err(TournamentError::InvalidTick {
                entry_id: tick.entry_id,
                reason: TickRejection::NonFinite,
            });
        }

        if let Some(last_applied) = entry.last_tick_at
            && tick.observed_at < last_applied
        {
            return Err(TournamentError::InvalidTick {
                entry_id: tick.entry_id,
                reason: TickRejection::Stale {
                    last_applied,
                    received: tick.observed_at,
                },
            });
        }

        let before = entry.performance;
        entry.performance = tick.snapshot;
        entry.last_tick_at = Some(tick.observed_at);

        log::debug!(
            "Tournament {}: tick for entry {} score {:.2}",
            self.id,
            tick.entry_id,
            tick.snapshot.battle_score
        );

        Ok((entry.participant.clone(), before))
    }

    async fn handle_disqualify(&mut self, position_id: PositionId) {
        if self.state == TournamentState::Ended {
            return;
        }

        let mut changed = false;
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| e.position_id == position_id && !e.disqualified)
        {
            entry.disqualified = true;
            changed = true;
            log::info!(
                "Tournament {}: entry {} disqualified, position {} out of range",
                self.id,
                entry.id,
                position_id
            );
        }

        if changed && self.state == TournamentState::Live {
            let events = self.recompute(Utc::now());
            self.context.activity.push_all(events).await;
        }
    }

    async fn handle_transition(
        &mut self,
        signal: LifecycleSignal,
    ) -> TournamentResult<TournamentState> {
        let target = match signal {
            LifecycleSignal::Start => TournamentState::Live,
            LifecycleSignal::End => TournamentState::Ended,
        };

        match (self.state, signal) {
            (TournamentState::Upcoming, LifecycleSignal::Start) => {
                self.set_state(TournamentState::Live);
                let events = self.recompute(Utc::now());
                self.context.activity.push_all(events).await;
            }
            (TournamentState::Live, LifecycleSignal::End) => {
                let now = Utc::now();
                let events = self.recompute(now);
                self.context.activity.push_all(events).await;
                self.set_state(TournamentState::Ended);
                self.settle(now).await;
            }
            (current, _) if current == target => {
                log::debug!("Tournament {}: repeated {:?} signal ignored", self.id, signal);
            }
            (from, _) => return Err(TournamentError::InvalidTransition { from, to: target }),
        }

        Ok(self.state)
    }

    fn set_state(&mut self, state: TournamentState) {
        log::info!("Tournament {}: {} -> {}", self.id, self.state, state);
        self.state = state;
        self.state_tx.send_replace(state);
    }

    /// Re-rank every entry and publish a new leaderboard version
    fn recompute(&mut self, now: DateTime<Utc>) -> Vec<ActivityEvent> {
        let previous = self.leaderboard.ranks();
        let standings = self.engine.rank(&self.entries, &previous);
        let events = self.detector.rank_events(self.id, &standings, now);

        let version = self.leaderboard.version + 1;
        self.leaderboard = Arc::new(self.engine.leaderboard(self.id, version, standings, now));
        self.standings_tx.send_replace(Arc::clone(&self.leaderboard));

        log::debug!(
            "Tournament {}: leaderboard v{} with {} ranked",
            self.id,
            version,
            self.leaderboard.total_ranked
        );

        events
    }

    /// Decide refunds and payouts from the final leaderboard
    async fn settle(&mut self, now: DateTime<Utc>) {
        let board = Arc::clone(&self.leaderboard);
        let total = u32::try_from(board.total_ranked).unwrap_or(u32::MAX);
        let refund_fraction_bps = self.context.rules.refund_fraction_bps;

        let mut results = Vec::with_capacity(self.entries.len());
        let mut refunded_fees = 0i64;

        for standing in &board.standings {
            let Some(&idx) = self.entry_index.get(&standing.entry_id) else {
                continue;
            };
            let entry = &mut self.entries[idx];

            let decision = eligibility::settle(standing.rank, total, refund_fraction_bps);
            entry.refund_eligible = Some(decision.refund_eligible);

            let refund_amount = if decision.refund_eligible {
                entry.entry_fee
            } else {
                0
            };
            refunded_fees = refunded_fees.saturating_add(refund_amount);

            results.push(SettledEntry {
                entry_id: entry.id,
                participant: entry.participant.clone(),
                final_rank: Some(standing.rank),
                refund_eligible: decision.refund_eligible,
                refund_amount,
                payout: 0,
            });
        }

        let pool = self.gross_pool().saturating_sub(refunded_fees);
        let prize_structure = PrizeStructure::from_shares(
            pool,
            &self.context.rules.payout_shares_bps,
            results.len(),
        );

        for result in &mut results {
            result.payout = result
                .final_rank
                .and_then(|rank| prize_structure.payout_for_position(rank as usize))
                .unwrap_or(0);
        }

        for entry in self.entries.iter_mut().filter(|e| e.disqualified) {
            entry.refund_eligible = Some(false);
            results.push(SettledEntry {
                entry_id: entry.id,
                participant: entry.participant.clone(),
                final_rank: None,
                refund_eligible: false,
                refund_amount: 0,
                payout: 0,
            });
        }

        for result in &results {
            self.context
                .participants
                .record_result(&result.participant, result.final_rank, result.payout)
                .await;
        }

        log::info!(
            "Tournament {} settled: {} ranked, {} refunded, pool {}",
            self.id,
            total,
            refunded_fees,
            pool
        );

        self.settlement = Some(SettlementReport {
            tournament_id: self.id,
            settled_at: now,
            total_ranked: total,
            refunded_fees,
            prize_structure,
            results,
        });
    }

    /// Guaranteed pool plus every fee collected, before refunds
    fn gross_pool(&self) -> i64 {
        self.config.prize_pool.saturating_add(self.collected_fees)
    }

    fn info(&self, now: DateTime<Utc>) -> TournamentInfo {
        let starts_at = self.config.starts_at;
        let (time_remaining_secs, progress) = match self.state {
            TournamentState::Upcoming => (None, 0.0),
            TournamentState::Live => (
                Some((self.ends_at - now).num_seconds().max(0)),
                TournamentInfo::progress_at(starts_at, self.ends_at, now),
            ),
            TournamentState::Ended => (None, 1.0),
        };

        let prize_pool = match &self.settlement {
            Some(report) => report.prize_structure.total_pool,
            None => self.gross_pool(),
        };

        TournamentInfo {
            id: self.id,
            config: self.config.clone(),
            state: self.state,
            ends_at: self.ends_at,
            entrant_count: self.entries.len(),
            prize_pool,
            time_remaining_secs,
            progress,
        }
    }
}
