use super::action::build_actions;
use super::action::ActionType;
use super::action::DraftAction;
use super::action::Lane;
use super::action::Phase;
use crate::identity::Identity;
use serde_json::json;
use serde_json::Value;
use std::collections::HashSet;

/// Per-action timer.
pub const ACTION_TIMEOUT_MS: i64 = 30_000;
/// Confirmation window. Expiring without 10-of-10 cancels the match.
pub const CONFIRM_TIMEOUT_MS: i64 = 60_000;
/// Votes on the same real-game id sufficient to finalize a non-special match.
pub const QUORUM: u32 = 5;

const LANE_NAMES: [&str; 5] = ["top", "jungle", "mid", "adc", "support"];

#[derive(Clone, Debug)]
pub struct RosterPlayer {
    pub identity: Identity,
    pub mmr: f32,
}

/// Engine lifecycle, distinct from per-action status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
    Created,
    Running,
    Completed,
    Confirmed,
    Cancelled,
}

/// Ephemeral + persisted draft state for one match.
#[derive(Clone, Debug)]
pub struct DraftState {
    pub actions: Vec<DraftAction>,
    pub current_index: usize,
    pub last_action_start_ms: i64,
    pub team1: [RosterPlayer; 5],
    pub team2: [RosterPlayer; 5],
    pub confirmations: HashSet<Identity>,
    pub phase: EnginePhase,
    /// When the current action's bot actor should auto-play:
    /// `ACTION_TIMEOUT/2 + jitter`. `None` when the current actor is
    /// human or the draft isn't active.
    pub bot_fire_at_ms: Option<i64>,
}

impl DraftState {
    pub fn new(team1: [RosterPlayer; 5], team2: [RosterPlayer; 5], now_ms: i64) -> Self {
        let mut state = Self {
            actions: build_actions(),
            current_index: 0,
            last_action_start_ms: now_ms,
            team1,
            team2,
            confirmations: HashSet::new(),
            phase: EnginePhase::Created,
            bot_fire_at_ms: None,
        };
        state.recompute_bot_timer();
        state
    }

    pub fn current_action(&self) -> Option<&DraftAction> {
        self.actions.get(self.current_index)
    }

    pub fn roster(&self, team: u8) -> &[RosterPlayer; 5] {
        if team == 1 { &self.team1 } else { &self.team2 }
    }

    /// Recomputes `bot_fire_at_ms` for whichever action is now current.
    /// Called after every advance (initial start, action write, timeout).
    pub fn recompute_bot_timer(&mut self) {
        self.bot_fire_at_ms = self.current_action().and_then(|a| {
            let actor = &self.roster(a.team)[a.lane.slot()];
            actor.identity.is_bot().then(|| {
                let jitter_ms = (rand::random::<u64>() % 3_000) as i64;
                self.last_action_start_ms + ACTION_TIMEOUT_MS / 2 + jitter_ms
            })
        });
    }

    pub fn player_at(&self, team: u8, lane: Lane) -> &RosterPlayer {
        &self.roster(team)[lane.slot()]
    }

    pub fn all_players(&self) -> impl Iterator<Item = &Identity> {
        self.team1.iter().chain(self.team2.iter()).map(|p| &p.identity)
    }

    /// Normalized keys already completed in this match, bans and picks
    /// share the uniqueness space.
    pub fn used_keys(&self) -> HashSet<String> {
        self.actions
            .iter()
            .filter(|a| a.is_completed())
            .filter_map(|a| a.champion_key.clone())
            .collect()
    }

    pub fn keys_picked_by_team(&self, team: u8) -> HashSet<String> {
        self.actions
            .iter()
            .filter(|a| a.team == team && a.kind == ActionType::Pick && a.is_completed())
            .filter_map(|a| a.champion_key.clone())
            .collect()
    }

    pub fn time_remaining_ms(&self, now_ms: i64) -> i64 {
        (ACTION_TIMEOUT_MS - (now_ms - self.last_action_start_ms)).max(0)
    }

    /// Serialized draft JSON: both the hierarchical
    /// (`teams.blue/red.players[].actions`) and flat (`actions[]`,
    /// `team1[]`, `team2[]`) views, regenerated from the flat source of
    /// truth on every persist.
    pub fn to_json(&self) -> Value {
        let current = self.current_action();
        json!({
            "currentIndex": self.current_index,
            "currentPhase": current.map(|a| a.phase.as_str()).unwrap_or(Phase::Completed.as_str()),
            "currentTeam": current.map(|a| a.team),
            "currentActionType": current.map(|a| match a.kind {
                ActionType::Ban => "ban",
                ActionType::Pick => "pick",
            }),
            "lastActionStartMs": self.last_action_start_ms,
            "confirmations": self.confirmations.iter().map(|i| i.canonical()).collect::<Vec<_>>(),
            "teams": {
                "blue": self.team_view(1, "blue"),
                "red": self.team_view(2, "red"),
            },
            "team1": self.flat_team(1),
            "team2": self.flat_team(2),
            "actions": self.actions.iter().map(Self::action_view).collect::<Vec<_>>(),
        })
    }

    fn action_view(a: &DraftAction) -> Value {
        json!({
            "index": a.index,
            "type": match a.kind { ActionType::Ban => "ban", ActionType::Pick => "pick" },
            "championId": a.champion_key,
            "championName": a.champion_name,
            "phase": a.phase.as_str(),
            "status": if a.is_open() { "open" } else if a.is_skipped() { "skipped" } else { "completed" },
            "team": a.team,
            "lane": format!("{:?}", a.lane).to_lowercase(),
            "byPlayer": a.by_player,
        })
    }

    fn flat_team(&self, team: u8) -> Value {
        self.roster(team)
            .iter()
            .map(|p| json!({ "summonerName": p.identity.canonical(), "mmr": p.mmr }))
            .collect::<Vec<_>>()
            .into()
    }

    fn team_view(&self, team: u8, name: &str) -> Value {
        let roster = self.roster(team);
        let average_mmr = roster.iter().map(|p| p.mmr).sum::<f32>() / roster.len() as f32;
        let all_bans: Vec<&String> = self
            .actions
            .iter()
            .filter(|a| a.team == team && a.kind == ActionType::Ban)
            .filter_map(|a| a.champion_key.as_ref())
            .collect();
        let all_picks: Vec<&String> = self
            .actions
            .iter()
            .filter(|a| a.team == team && a.kind == ActionType::Pick)
            .filter_map(|a| a.champion_key.as_ref())
            .collect();
        let players = roster
            .iter()
            .enumerate()
            .map(|(team_index, p)| {
                let actions: Vec<Value> = self
                    .actions
                    .iter()
                    .filter(|a| a.team == team && a.lane.slot() == team_index)
                    .map(Self::action_view)
                    .collect();
                let bans: Vec<Value> = actions
                    .iter()
                    .filter(|a| a["type"] == "ban")
                    .cloned()
                    .collect();
                let picks: Vec<Value> = actions
                    .iter()
                    .filter(|a| a["type"] == "pick")
                    .cloned()
                    .collect();
                json!({
                    "summonerName": p.identity.canonical(),
                    "assignedLane": LANE_NAMES[team_index],
                    "teamIndex": team_index,
                    "mmr": p.mmr,
                    "actions": actions,
                    "bans": bans,
                    "picks": picks,
                })
            })
            .collect::<Vec<_>>();
        json!({
            "name": name,
            "teamNumber": team,
            "averageMmr": average_mmr,
            "allBans": all_bans,
            "allPicks": all_picks,
            "players": players,
        })
    }

    /// Rebuilds a DraftState from a persisted `draftJson`. Reads the
    /// flat source of truth (`actions`, `team1`, `team2`); the
    /// hierarchical view is derived, not authoritative.
    pub fn from_json(value: &Value, now_ms: i64) -> anyhow::Result<Self> {
        let team1 = Self::roster_from_flat(value.get("team1"))?;
        let team2 = Self::roster_from_flat(value.get("team2"))?;
        let actions_json = value
            .get("actions")
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow::anyhow!("draftJson missing actions[]"))?;
        let mut actions = build_actions();
        for entry in actions_json {
            let index = entry["index"].as_u64().unwrap_or(0) as usize;
            if let Some(slot) = actions.get_mut(index) {
                slot.champion_key = entry["championId"].as_str().map(|s| s.to_string());
                slot.champion_name = entry["championName"].as_str().map(|s| s.to_string());
                slot.by_player = entry["byPlayer"].as_str().map(|s| s.to_string());
            }
        }
        let current_index = value
            .get("currentIndex")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as usize;
        let confirmations: HashSet<Identity> = value
            .get("confirmations")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(Identity::from)
                    .collect()
            })
            .unwrap_or_default();
        let phase = if current_index >= 20 {
            if confirmations.len() >= 10 { EnginePhase::Confirmed } else { EnginePhase::Completed }
        } else if current_index == 0 && actions.iter().all(|a| a.is_open()) {
            EnginePhase::Created
        } else {
            EnginePhase::Running
        };
        let mut state = Self {
            actions,
            current_index,
            last_action_start_ms: now_ms,
            team1,
            team2,
            confirmations,
            phase,
            bot_fire_at_ms: None,
        };
        state.recompute_bot_timer();
        Ok(state)
    }

    fn roster_from_flat(value: Option<&Value>) -> anyhow::Result<[RosterPlayer; 5]> {
        let arr = value
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow::anyhow!("draftJson missing team roster"))?;
        if arr.len() != 5 {
            anyhow::bail!("team roster must have exactly 5 players");
        }
        let mut out = Vec::with_capacity(5);
        for entry in arr {
            let name = entry["summonerName"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("roster entry missing summonerName"))?;
            let mmr = entry["mmr"].as_f64().unwrap_or(0.0) as f32;
            out.push(RosterPlayer { identity: Identity::from(name), mmr });
        }
        Ok(out.try_into().expect("checked len == 5"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(prefix: &str) -> [RosterPlayer; 5] {
        (0..5)
            .map(|i| RosterPlayer { identity: Identity::new(format!("{prefix}{i}"), "NA1"), mmr: 1000.0 })
            .collect::<Vec<_>>()
            .try_into()
            .unwrap()
    }

    #[test]
    fn round_trip_through_json() {
        let state = DraftState::new(roster("a"), roster("b"), 1_000);
        let json = state.to_json();
        let restored = DraftState::from_json(&json, 2_000).unwrap();
        assert_eq!(restored.current_index, state.current_index);
        assert_eq!(restored.actions.len(), state.actions.len());
        assert_eq!(restored.team1[0].identity, state.team1[0].identity);
    }

    #[test]
    fn time_remaining_floors_at_zero() {
        let state = DraftState::new(roster("a"), roster("b"), 0);
        assert_eq!(state.time_remaining_ms(ACTION_TIMEOUT_MS + 5_000), 0);
        assert_eq!(state.time_remaining_ms(ACTION_TIMEOUT_MS), 0);
        assert_eq!(state.time_remaining_ms(1_000), ACTION_TIMEOUT_MS - 1_000);
    }
}
