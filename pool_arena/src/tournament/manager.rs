//! Tournament manager for spawning and routing to tournament actors.

use super::{
    actor::{ArenaContext, TournamentActor, TournamentHandle},
    errors::{TournamentError, TournamentResult},
    messages::TournamentMessage,
    models::{
        Entry, EntryId, LifecycleSignal, PerformanceTick, SettlementReport, TournamentConfig,
        TournamentId, TournamentInfo, TournamentState,
    },
};
use crate::{
    activity::{ActivityEvent, ActivityLog},
    config::ArenaConfig,
    eligibility::Eligibility,
    participant::{Participant, ParticipantId, ParticipantRegistry},
    position::{Position, PositionId, PositionRegistry},
    ranking::Leaderboard,
};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Final record of a tournament whose actor has been closed
#[derive(Debug, Clone)]
struct ArchivedTournament {
    info: TournamentInfo,
    standings: Arc<Leaderboard>,
    settlement: Option<SettlementReport>,
}

/// Tournament manager owning every tournament actor.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct TournamentManager {
    context: ArenaContext,

    /// Active tournament handles
    tournaments: Arc<RwLock<HashMap<TournamentId, TournamentHandle>>>,

    /// Ended tournaments past retention, kept read-only
    archived: Arc<RwLock<HashMap<TournamentId, ArchivedTournament>>>,

    /// Next tournament ID
    next_tournament_id: Arc<RwLock<TournamentId>>,

    /// Which tournament holds each entry, for routing ticks
    entry_routes: Arc<RwLock<HashMap<EntryId, TournamentId>>>,
}

impl TournamentManager {
    /// Create a new tournament manager with empty registries
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            context: ArenaContext::new(config),
            tournaments: Arc::new(RwLock::new(HashMap::new())),
            archived: Arc::new(RwLock::new(HashMap::new())),
            next_tournament_id: Arc::new(RwLock::new(1)),
            entry_routes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.context.rules
    }

    pub fn positions(&self) -> &Arc<PositionRegistry> {
        &self.context.positions
    }

    pub fn participants(&self) -> &Arc<ParticipantRegistry> {
        &self.context.participants
    }

    pub fn activity(&self) -> &Arc<ActivityLog> {
        &self.context.activity
    }

    /// Create and spawn a new tournament
    ///
    /// # Errors
    ///
    /// Returns [`TournamentError::InvalidConfig`] if the configuration fails
    /// validation or its schedule ends past the representable time range.
    pub async fn create_tournament(&self, config: TournamentConfig) -> TournamentResult<TournamentId> {
        config.validate().map_err(TournamentError::InvalidConfig)?;

        let title = config.title.clone();
        let (actor, handle, tournament_id) = {
            let mut next_id = self.next_tournament_id.write().await;
            let id = *next_id;
            let (actor, handle) = TournamentActor::new(id, config, self.context.clone())?;
            *next_id += 1;
            (actor, handle, id)
        };

        self.tournaments.write().await.insert(tournament_id, handle);

        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!("Created tournament {} '{}'", tournament_id, title);

        Ok(tournament_id)
    }

    async fn handle(&self, tournament_id: TournamentId) -> TournamentResult<TournamentHandle> {
        self.tournaments
            .read()
            .await
            .get(&tournament_id)
            .cloned()
            .ok_or(TournamentError::NotFound(tournament_id))
    }

    async fn archived(&self, tournament_id: TournamentId) -> Option<ArchivedTournament> {
        self.archived.read().await.get(&tournament_id).cloned()
    }

    async fn route(&self, entry_id: EntryId) -> TournamentResult<TournamentHandle> {
        let tournament_id = self
            .entry_routes
            .read()
            .await
            .get(&entry_id)
            .copied()
            .ok_or(TournamentError::EntryNotFound(entry_id))?;
        self.handle(tournament_id).await
    }

    /// Get tournament information
    pub async fn get_tournament(&self, tournament_id: TournamentId) -> TournamentResult<TournamentInfo> {
        if let Some(archived) = self.archived(tournament_id).await {
            return Ok(archived.info);
        }

        self.handle(tournament_id)
            .await?
            .request(|response| TournamentMessage::GetInfo { response })
            .await
    }

    /// List tournaments ordered by ID, optionally filtered by state
    pub async fn list_tournaments(&self, filter: Option<TournamentState>) -> Vec<TournamentInfo> {
        let mut handles: Vec<TournamentHandle> = self
            .tournaments
            .read()
            .await
            .values()
            .filter(|h| filter.is_none_or(|state| h.state() == state))
            .cloned()
            .collect();
        handles.sort_by_key(TournamentHandle::tournament_id);

        let mut infos = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle
                .request(|response| TournamentMessage::GetInfo { response })
                .await
            {
                Ok(info) => infos.push(info),
                Err(e) => log::warn!("Skipping tournament {}: {}", handle.tournament_id(), e),
            }
        }

        if filter.is_none_or(|state| state == TournamentState::Ended) {
            infos.extend(self.archived.read().await.values().map(|a| a.info.clone()));
            infos.sort_by_key(|info| info.id);
        }

        infos
    }

    /// Enter a participant's position into a tournament
    pub async fn join(
        &self,
        tournament_id: TournamentId,
        participant: ParticipantId,
        position_id: PositionId,
    ) -> TournamentResult<Entry> {
        if self.archived.read().await.contains_key(&tournament_id) {
            return Err(TournamentError::TournamentClosed);
        }

        let entry = self
            .handle(tournament_id)
            .await?
            .request(|response| TournamentMessage::Join {
                participant,
                position_id,
                response,
            })
            .await??;

        self.entry_routes.write().await.insert(entry.id, tournament_id);
        Ok(entry)
    }

    /// Whether a position could enter a tournament right now
    pub async fn get_eligibility(
        &self,
        position_id: PositionId,
        tournament_id: TournamentId,
    ) -> TournamentResult<Eligibility> {
        if self.archived.read().await.contains_key(&tournament_id) {
            return Err(TournamentError::TournamentClosed);
        }

        self.handle(tournament_id)
            .await?
            .request(|response| TournamentMessage::CheckEligibility {
                position_id,
                response,
            })
            .await?
    }

    /// Apply a performance tick and wait until it is accepted or rejected.
    ///
    /// Returns before the ranking is recomputed.
    pub async fn submit_performance_tick(&self, tick: PerformanceTick) -> TournamentResult<()> {
        self.route(tick.entry_id)
            .await?
            .request(|response| TournamentMessage::SubmitTick {
                tick,
                response: Some(response),
            })
            .await?
    }

    /// Queue a performance tick without waiting for any reply.
    ///
    /// Rejections are only logged by the tournament.
    ///
    /// # Errors
    ///
    /// Fails if the entry is unknown or the tournament inbox is full.
    pub async fn notify_performance_tick(&self, tick: PerformanceTick) -> TournamentResult<()> {
        let handle = self.route(tick.entry_id).await?;
        handle
            .try_send(TournamentMessage::SubmitTick {
                tick,
                response: None,
            })
            .inspect_err(|_| {
                log::warn!(
                    "Tournament {}: inbox full, tick for entry {} dropped",
                    handle.tournament_id(),
                    tick.entry_id
                );
            })
    }

    /// Latest published leaderboard
    pub async fn get_standings(&self, tournament_id: TournamentId) -> TournamentResult<Arc<Leaderboard>> {
        if let Some(archived) = self.archived(tournament_id).await {
            return Ok(archived.standings);
        }

        Ok(self.handle(tournament_id).await?.standings())
    }

    /// Up to `n` recent activity events, newest first
    pub async fn get_recent_activity(&self, n: usize) -> Vec<ActivityEvent> {
        self.context.activity.recent(n).await
    }

    /// Deliver a lifecycle signal
    pub async fn transition(
        &self,
        tournament_id: TournamentId,
        signal: LifecycleSignal,
    ) -> TournamentResult<TournamentState> {
        if self.archived.read().await.contains_key(&tournament_id) {
            return match signal {
                LifecycleSignal::End => Ok(TournamentState::Ended),
                LifecycleSignal::Start => Err(TournamentError::InvalidTransition {
                    from: TournamentState::Ended,
                    to: TournamentState::Live,
                }),
            };
        }

        self.handle(tournament_id)
            .await?
            .request(|response| TournamentMessage::Transition { signal, response })
            .await?
    }

    pub async fn start_tournament(&self, tournament_id: TournamentId) -> TournamentResult<TournamentState> {
        self.transition(tournament_id, LifecycleSignal::Start).await
    }

    pub async fn end_tournament(&self, tournament_id: TournamentId) -> TournamentResult<TournamentState> {
        self.transition(tournament_id, LifecycleSignal::End).await
    }

    /// Send start and end signals to every tournament whose schedule has
    /// been reached at `now`.
    ///
    /// # Returns
    ///
    /// * `usize` - Number of transitions applied
    pub async fn apply_clock(&self, now: DateTime<Utc>) -> usize {
        let handles: Vec<TournamentHandle> = self.tournaments.read().await.values().cloned().collect();
        let mut applied = 0;

        for handle in handles {
            let mut signals = Vec::new();
            match handle.state() {
                TournamentState::Upcoming if now >= handle.starts_at() => {
                    signals.push(LifecycleSignal::Start);
                    if now >= handle.ends_at() {
                        signals.push(LifecycleSignal::End);
                    }
                }
                TournamentState::Live if now >= handle.ends_at() => {
                    signals.push(LifecycleSignal::End);
                }
                _ => {}
            }

            for signal in signals {
                let result = handle
                    .request(|response| TournamentMessage::Transition { signal, response })
                    .await;

                match result {
                    Ok(Ok(_)) => applied += 1,
                    Ok(Err(e)) | Err(e) => {
                        log::warn!("Tournament {}: clock signal failed: {}", handle.tournament_id(), e);
                        break;
                    }
                }
            }
        }

        applied
    }

    /// Close the actors of tournaments that ended more than the retention
    /// period before `now`, keeping their info, final standings and
    /// settlement readable.
    ///
    /// Entries of archived tournaments are no longer routable.
    ///
    /// # Returns
    ///
    /// * `usize` - Number of tournaments archived
    pub async fn archive_ended(&self, now: DateTime<Utc>) -> usize {
        let retention = self.context.rules.retention();
        let expired: Vec<TournamentHandle> = self
            .tournaments
            .read()
            .await
            .values()
            .filter(|h| {
                h.state() == TournamentState::Ended
                    && h.ends_at().checked_add_signed(retention).is_some_and(|until| until <= now)
            })
            .cloned()
            .collect();

        let mut archived = 0;
        for handle in expired {
            let tournament_id = handle.tournament_id();
            let info = match handle
                .request(|response| TournamentMessage::GetInfo { response })
                .await
            {
                Ok(info) => info,
                Err(e) => {
                    log::warn!("Tournament {}: could not archive: {}", tournament_id, e);
                    continue;
                }
            };
            let settlement = handle
                .request(|response| TournamentMessage::GetSettlement { response })
                .await
                .ok()
                .flatten();

            if let Some(report) = &settlement {
                let mut routes = self.entry_routes.write().await;
                for result in &report.results {
                    routes.remove(&result.entry_id);
                }
            }

            self.archived.write().await.insert(
                tournament_id,
                ArchivedTournament {
                    info,
                    standings: handle.standings(),
                    settlement,
                },
            );
            self.tournaments.write().await.remove(&tournament_id);

            if let Err(e) = handle.send(TournamentMessage::Close).await {
                log::warn!("Tournament {}: close failed: {}", tournament_id, e);
            }

            log::info!("Archived tournament {}", tournament_id);
            archived += 1;
        }

        archived
    }

    /// Record an external range rebalance.
    ///
    /// A position leaving its range disqualifies its running entries.
    pub async fn update_position_range(
        &self,
        position_id: PositionId,
        in_range: bool,
    ) -> TournamentResult<Position> {
        let position = self
            .context
            .positions
            .set_in_range(position_id, in_range)
            .await
            .map_err(|_| TournamentError::PositionNotFound(position_id))?;

        if !in_range {
            let handles: Vec<TournamentHandle> =
                self.tournaments.read().await.values().cloned().collect();
            for handle in handles {
                if let Err(e) = handle.send(TournamentMessage::Disqualify { position_id }).await {
                    log::warn!("Could not notify tournament {}: {}", handle.tournament_id(), e);
                }
            }
        }

        Ok(position)
    }

    /// Settlement report, `None` until the tournament has ended
    pub async fn settlement(&self, tournament_id: TournamentId) -> TournamentResult<Option<SettlementReport>> {
        if let Some(archived) = self.archived(tournament_id).await {
            return Ok(archived.settlement);
        }

        self.handle(tournament_id)
            .await?
            .request(|response| TournamentMessage::GetSettlement { response })
            .await
    }

    /// Look up an entry in any tournament
    pub async fn get_entry(&self, entry_id: EntryId) -> TournamentResult<Entry> {
        self.route(entry_id)
            .await?
            .request(|response| TournamentMessage::GetEntry { entry_id, response })
            .await?
            .ok_or(TournamentError::EntryNotFound(entry_id))
    }

    pub async fn get_participant(&self, participant: &ParticipantId) -> Option<Participant> {
        self.context.participants.get(participant).await
    }

    /// Number of archived tournaments
    pub async fn archived_count(&self) -> usize {
        self.archived.read().await.len()
    }

    /// Get active tournament count
    pub async fn tournament_count(&self) -> usize {
        self.tournaments.read().await.len()
    }

    /// Stop every tournament actor
    pub async fn shutdown(&self) {
        let handles: Vec<TournamentHandle> = self.tournaments.write().await.drain().map(|(_, h)| h).collect();

        for handle in &handles {
            let _ = handle.send(TournamentMessage::Close).await;
        }

        self.entry_routes.write().await.clear();
        log::info!("Stopped {} tournaments", handles.len());
    }
}
