use crate::draft::ActionType;
use crate::draft::DraftState;
use crate::draft::Lane;
use crate::record::MatchId;
use serde_json::json;
use serde_json::Value;

/// One roster entry in the in-progress game snapshot.
pub struct GamePlayer {
    pub summoner_name: String,
    pub team: u8,
    pub lane: Lane,
    pub champion_key: Option<String>,
    pub champion_name: Option<String>,
}

/// Builds the `gameJson` snapshot from a just-completed draft state:
/// the 10 players, their assigned lanes, and their selected champion
/// keys and names.
pub fn build_game_json(match_id: MatchId, state: &DraftState) -> Value {
    let lanes = [Lane::Top, Lane::Jungle, Lane::Mid, Lane::Adc, Lane::Support];
    let mut players: Vec<GamePlayer> = [1u8, 2u8]
        .into_iter()
        .flat_map(|team| {
            let roster = state.roster(team);
            lanes.into_iter().map(move |lane| GamePlayer {
                summoner_name: roster[lane.slot()].identity.canonical(),
                team,
                lane,
                champion_key: None,
                champion_name: None,
            })
        })
        .collect();

    for action in state.actions.iter().filter(|a| a.kind == ActionType::Pick && a.is_completed()) {
        if let Some(player) =
            players.iter_mut().find(|p| p.team == action.team && p.lane == action.lane)
        {
            player.champion_key = action.champion_key.clone();
            player.champion_name = action.champion_name.clone();
        }
    }

    json!({
        "matchId": match_id,
        "startedAt": crate::record::now_ms(),
        "players": players.iter().map(|p| json!({
            "summonerName": p.summoner_name,
            "team": p.team,
            "lane": format!("{:?}", p.lane).to_lowercase(),
            "championId": p.champion_key,
            "championName": p.champion_name,
        })).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::RosterPlayer;

    fn roster(prefix: &str) -> [RosterPlayer; 5] {
        std::array::from_fn(|i| RosterPlayer {
            identity: crate::identity::Identity::from(format!("{prefix}{i}").as_str()),
            mmr: 1200.0,
        })
    }

    #[test]
    fn snapshot_carries_completed_picks_and_skips_open_bans() {
        let mut state = DraftState::new(roster("blue"), roster("red"), 0);
        for action in state.actions.iter_mut().filter(|a| a.kind == ActionType::Pick) {
            action.champion_key = Some("ahri".to_string());
            action.champion_name = Some("Ahri".to_string());
        }
        let snapshot = build_game_json(42, &state);
        assert_eq!(snapshot["matchId"], 42);
        let players = snapshot["players"].as_array().expect("players array");
        assert_eq!(players.len(), 10);
        assert!(players.iter().all(|p| p["championId"] == "ahri"));
    }

    #[test]
    fn snapshot_leaves_unpicked_slots_without_champion() {
        let state = DraftState::new(roster("blue"), roster("red"), 0);
        let snapshot = build_game_json(7, &state);
        let players = snapshot["players"].as_array().expect("players array");
        assert!(players.iter().all(|p| p["championId"].is_null()));
    }
}
