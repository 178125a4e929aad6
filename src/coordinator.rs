use crate::catalog::Catalog;
use crate::config::Config;
use crate::draft::DraftEngine;
use crate::draft::DraftState;
use crate::error::OrchestratorError;
use crate::error::Result;
use crate::game;
use crate::identity::Identity;
use crate::lcu::LcuGateway;
use crate::queue::BalancedMatch;
use crate::queue::Queue;
use crate::queue::QueuedPlayer;
use crate::record::MatchId;
use crate::record::MatchRecord;
use crate::record::MatchStatus;
use crate::registry::OutboundEvent;
use crate::registry::Registry;
use crate::special::SpecialUsers;
use crate::store::MatchStore;
use crate::store::SettingsStore;
use crate::store::VoteStore;
use crate::voting::VoteResult;
use crate::voting::VotingService;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ties the session registry, queue, draft engines, and voting service
/// together behind one shared handle. Each active match's draft engine
/// is its own logical lock; the coordinator only synchronizes the map
/// of which matches exist.
pub struct Coordinator {
    pub registry: Arc<Registry>,
    pub catalog: Arc<Catalog>,
    pub special: Arc<SpecialUsers>,
    pub lcu: Arc<LcuGateway>,
    pub matches: Arc<MatchStore>,
    pub votes: Arc<VoteStore>,
    pub settings: Arc<SettingsStore>,
    pub queue: Arc<Queue>,
    pub voting: Arc<VotingService>,
    engines: RwLock<HashMap<MatchId, Arc<DraftEngine>>>,
}

impl Coordinator {
    pub async fn bootstrap(config: &Config) -> Arc<Self> {
        let client = crate::store::connect(config).await;
        let matches = Arc::new(MatchStore::new(client.clone(), instance_id()));
        let votes = Arc::new(VoteStore::new(client.clone()));
        let settings = Arc::new(SettingsStore::new(client.clone()));
        let special_users = settings.special_users().await.unwrap_or_else(|e| {
            log::warn!("failed to load special users, starting empty: {e}");
            Vec::new()
        });
        let special = Arc::new(SpecialUsers::new(special_users));
        let catalog = Arc::new(Catalog::new(config.champion_cdn_version.clone()));
        catalog.refresh().await;
        let registry = Arc::new(Registry::default());
        let lcu = Arc::new(LcuGateway::default());
        let voting = Arc::new(VotingService::new(
            matches.clone(),
            votes.clone(),
            special.clone(),
            lcu.clone(),
            registry.clone(),
        ));

        let coordinator = Arc::new(Self {
            registry,
            catalog,
            special,
            lcu,
            matches,
            votes,
            settings,
            queue: Arc::new(Queue::default()),
            voting,
            engines: RwLock::new(HashMap::new()),
        });
        coordinator.restore().await;
        coordinator
    }

    /// Rehydrates every non-terminal match's draft engine from its
    /// persisted `draftJson` on cold start.
    async fn restore(self: &Arc<Self>) {
        let active = match self.matches.active().await {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("failed to scan active matches on restore: {e}");
                return;
            }
        };
        for record in active {
            if record.status != MatchStatus::Draft {
                log::info!(
                    "match {} restored as {:?} without a live draft engine",
                    record.id,
                    record.status
                );
                continue;
            }
            let Some(draft_json) = &record.draft_json else {
                log::warn!("match {} is status=draft but has no draftJson, skipping", record.id);
                continue;
            };
            let now = crate::record::now_ms();
            match DraftState::from_json(draft_json, now) {
                Ok(state) => {
                    let engine = DraftEngine::new(
                        record.id,
                        state,
                        self.catalog.clone(),
                        self.matches.clone(),
                        self.registry.clone(),
                    );
                    self.engines.write().await.insert(record.id, engine);
                    log::info!("restored draft engine for match {}", record.id);
                }
                Err(e) => log::error!("failed to rehydrate match {}: {e}", record.id),
            }
        }
    }

    pub async fn join_queue(&self, player: QueuedPlayer) -> Result<Option<MatchRecord>> {
        match self.queue.join(player).await {
            Some(balanced) => Ok(Some(self.start_match(balanced).await?)),
            None => Ok(None),
        }
    }

    pub async fn leave_queue(&self, identity: &Identity) -> bool {
        self.queue.leave(identity).await
    }

    /// Persists the match row and spins up its draft engine.
    async fn start_match(&self, balanced: BalancedMatch) -> Result<MatchRecord> {
        let team1: Vec<Identity> = balanced.team1.iter().map(|p| p.identity.clone()).collect();
        let team2: Vec<Identity> = balanced.team2.iter().map(|p| p.identity.clone()).collect();
        let record = self
            .matches
            .create(
                team1,
                team2,
                balanced.average_skill_team1,
                balanced.average_skill_team2,
            )
            .await
            .map_err(OrchestratorError::Persistence)?;

        let now = crate::record::now_ms();
        let state = DraftState::new(balanced.team1, balanced.team2, now);
        self.matches
            .set_draft_json(record.id, state.to_json())
            .await
            .map_err(OrchestratorError::Persistence)?;
        let engine = DraftEngine::new(
            record.id,
            state,
            self.catalog.clone(),
            self.matches.clone(),
            self.registry.clone(),
        );
        self.engines.write().await.insert(record.id, engine);

        let roster: Vec<String> = record.roster().map(|i| i.canonical()).collect();
        self.registry
            .broadcast_to(
                &record.roster().cloned().collect::<Vec<_>>(),
                &OutboundEvent::MatchFound(serde_json::json!({
                    "matchId": record.id,
                    "team1": record.team1_players.iter().map(|i| i.canonical()).collect::<Vec<_>>(),
                    "team2": record.team2_players.iter().map(|i| i.canonical()).collect::<Vec<_>>(),
                })),
            )
            .await;
        log::info!("match {} created for roster {:?}", record.id, roster);
        Ok(record)
    }

    async fn engine(&self, match_id: MatchId) -> Result<Arc<DraftEngine>> {
        self.engines
            .read()
            .await
            .get(&match_id)
            .cloned()
            .ok_or_else(|| OrchestratorError::NotFound(format!("no active draft for match {match_id}")))
    }

    pub async fn draft_action(
        &self,
        match_id: MatchId,
        action_index: usize,
        champion_ref: &str,
        by_player: &Identity,
    ) -> Result<bool> {
        let engine = self.engine(match_id).await?;
        engine.process_action(action_index, champion_ref, by_player).await
    }

    pub async fn change_pick(
        &self,
        match_id: MatchId,
        action_index: usize,
        champion_ref: &str,
        by_player: &Identity,
    ) -> Result<()> {
        let engine = self.engine(match_id).await?;
        engine.change_pick(action_index, champion_ref, by_player).await
    }

    /// On 10-of-10, hands off to the in-progress game tracking and
    /// retires the draft engine.
    pub async fn confirm_player(
        &self,
        match_id: MatchId,
        by_player: &Identity,
    ) -> Result<crate::draft::ConfirmResult> {
        let engine = self.engine(match_id).await?;
        let result = engine.confirm_player(by_player).await?;
        if result.all_confirmed {
            let state = engine.snapshot().await;
            let game_json = game::build_game_json(match_id, &state);
            self.matches
                .set_game_json(match_id, MatchStatus::InProgress, game_json.clone())
                .await
                .map_err(OrchestratorError::Persistence)?;
            self.engines.write().await.remove(&match_id);
            self.registry
                .broadcast(&OutboundEvent::GameStarted(serde_json::json!({
                    "matchId": match_id,
                    "game": game_json,
                })))
                .await;
        }
        Ok(result)
    }

    /// Persists the privileged-voter set and refreshes the cached copy
    /// read by `SpecialUsers::is_special`.
    pub async fn set_special_users(&self, users: Vec<Identity>) -> Result<()> {
        self.settings
            .set_special_users(&users)
            .await
            .map_err(OrchestratorError::Persistence)?;
        self.special.set(users).await;
        Ok(())
    }

    pub async fn vote(
        &self,
        match_id: MatchId,
        voter: &Identity,
        chosen_real_game_id: &str,
    ) -> Result<VoteResult> {
        self.voting.vote(match_id, voter, chosen_real_game_id).await
    }

    pub async fn remove_vote(&self, match_id: MatchId, voter: &Identity) -> Result<()> {
        self.voting.remove_vote(match_id, voter).await
    }

    pub async fn votes(&self, match_id: MatchId) -> Result<HashMap<String, u32>> {
        self.voting.tally(match_id).await
    }

    pub async fn cancel_match(&self, match_id: MatchId) -> Result<()> {
        if let Some(engine) = self.engines.write().await.remove(&match_id) {
            engine.cancel().await;
        }
        self.matches.cancel(match_id).await.map_err(OrchestratorError::Persistence)
    }

    pub async fn get_match(&self, match_id: MatchId) -> Result<MatchRecord> {
        self.matches
            .get(match_id)
            .await
            .map_err(OrchestratorError::Persistence)?
            .ok_or_else(|| OrchestratorError::NotFound(format!("match {match_id}")))
    }

    /// Most recent non-terminal match for this player, if any.
    pub async fn my_active_match(&self, identity: &Identity) -> Result<MatchRecord> {
        self.matches
            .active_for(identity)
            .await
            .map_err(OrchestratorError::Persistence)?
            .ok_or_else(|| OrchestratorError::NotFound(format!("no active match for {identity}")))
    }

    /// Test hook: seeds an `in_progress` match directly from a supplied
    /// external-game payload, bypassing queue/draft.
    pub async fn simulate_last_match(
        &self,
        team1: Vec<Identity>,
        team2: Vec<Identity>,
        game_json: serde_json::Value,
    ) -> Result<MatchRecord> {
        let record = self
            .matches
            .create(team1, team2, 0.0, 0.0)
            .await
            .map_err(OrchestratorError::Persistence)?;
        self.matches
            .set_game_json(record.id, MatchStatus::InProgress, game_json)
            .await
            .map_err(OrchestratorError::Persistence)?;
        self.get_match(record.id).await
    }

    /// Scheduler hook: ticks every active draft engine; cancels any
    /// match whose confirmation window expired without reaching
    /// 10-of-10.
    pub async fn tick_drafts(&self) {
        let engines: Vec<Arc<DraftEngine>> = self.engines.read().await.values().cloned().collect();
        for engine in engines {
            if engine.tick().await {
                log::info!("match {} confirmation window expired, cancelling", engine.match_id);
                if let Err(e) = self.cancel_match(engine.match_id).await {
                    log::error!("failed to cancel match {}: {e}", engine.match_id);
                }
            }
        }
    }

    pub async fn heartbeat_active_matches(&self) {
        let ids: Vec<MatchId> = self.engines.read().await.keys().cloned().collect();
        for id in ids {
            if let Err(e) = self.matches.heartbeat(id).await {
                log::warn!("failed to heartbeat match {id}: {e}");
            }
        }
    }
}

fn instance_id() -> String {
    format!("orchestrator-{}", crate::record::now_ms())
}
