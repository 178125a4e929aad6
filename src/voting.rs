use crate::draft::QUORUM;
use crate::error::OrchestratorError;
use crate::error::Result;
use crate::identity::Identity;
use crate::lcu::LcuGateway;
use crate::record::MatchId;
use crate::record::MatchStatus;
use crate::record::Winner;
use crate::registry::OutboundEvent;
use crate::registry::Registry;
use crate::special::SpecialUsers;
use crate::store::MatchStore;
use crate::store::VoteStore;
use serde_json::json;
use std::sync::Arc;

/// Outcome of a single `vote` call.
pub struct VoteResult {
    pub vote_count: u32,
    pub lcu_game_id: String,
    pub should_link: bool,
    pub special_user_vote: bool,
    pub voter_name: String,
}

/// Collects per-player votes on which external real game a completed
/// custom match corresponds to, and finalizes by quorum or privileged
/// override.
pub struct VotingService {
    matches: Arc<MatchStore>,
    votes: Arc<VoteStore>,
    special: Arc<SpecialUsers>,
    lcu: Arc<LcuGateway>,
    registry: Arc<Registry>,
}

impl VotingService {
    pub fn new(
        matches: Arc<MatchStore>,
        votes: Arc<VoteStore>,
        special: Arc<SpecialUsers>,
        lcu: Arc<LcuGateway>,
        registry: Arc<Registry>,
    ) -> Self {
        Self { matches, votes, special, lcu, registry }
    }

    pub async fn vote(
        &self,
        match_id: MatchId,
        voter: &Identity,
        chosen_real_game_id: &str,
    ) -> Result<VoteResult> {
        let record = self
            .matches
            .get(match_id)
            .await
            .map_err(OrchestratorError::Persistence)?
            .ok_or_else(|| OrchestratorError::NotFound(format!("match {match_id}")))?;
        if record.status != MatchStatus::InProgress {
            return Err(OrchestratorError::OutOfOrder(format!(
                "match {match_id} is not in_progress"
            )));
        }
        if record.roster().all(|p| p != voter) {
            return Err(OrchestratorError::Unauthorized(format!("{voter} is not on the roster")));
        }

        self.votes
            .vote(match_id, voter, chosen_real_game_id)
            .await
            .map_err(OrchestratorError::Persistence)?;
        let tally = self.votes.tally(match_id).await.map_err(OrchestratorError::Persistence)?;
        self.registry
            .broadcast(&OutboundEvent::MatchVoteUpdate(json!({
                "matchId": match_id,
                "tally": tally,
            })))
            .await;

        let vote_count = *tally.get(chosen_real_game_id).unwrap_or(&0);
        let is_special = self.special.is_special(voter).await;
        let should_link = if is_special {
            self.registry
                .broadcast(&OutboundEvent::SpecialUserVote(json!({
                    "matchId": match_id,
                    "voter": voter.canonical(),
                    "lcuGameId": chosen_real_game_id,
                })))
                .await;
            true
        } else {
            tally.values().any(|&count| count >= QUORUM)
        };

        let result = VoteResult {
            vote_count,
            lcu_game_id: chosen_real_game_id.to_string(),
            should_link,
            special_user_vote: is_special,
            voter_name: voter.canonical(),
        };

        if should_link {
            self.link_match(match_id, voter, chosen_real_game_id).await?;
        }
        Ok(result)
    }

    pub async fn remove_vote(&self, match_id: MatchId, voter: &Identity) -> Result<()> {
        self.votes.remove(match_id, voter).await.map_err(OrchestratorError::Persistence)
    }

    pub async fn tally(
        &self,
        match_id: MatchId,
    ) -> Result<std::collections::HashMap<String, u32>> {
        self.votes.tally(match_id).await.map_err(OrchestratorError::Persistence)
    }

    /// Fetches the real-game payload through the LCU gateway, detects
    /// the winner, and atomically writes the linking fields.
    async fn link_match(
        &self,
        match_id: MatchId,
        caller: &Identity,
        real_game_id: &str,
    ) -> Result<()> {
        let record = self
            .matches
            .get(match_id)
            .await
            .map_err(OrchestratorError::Persistence)?
            .ok_or_else(|| OrchestratorError::NotFound(format!("match {match_id}")))?;
        if record.status == MatchStatus::Completed {
            return Err(OrchestratorError::Conflict(format!("match {match_id} already completed")));
        }

        let payload = self
            .lcu
            .fetch_game_details(&self.registry, caller, real_game_id)
            .await
            .map_err(OrchestratorError::Upstream)?;

        let winner = detect_winner(&payload);
        let duration = payload.get("gameDuration").and_then(|d| d.as_i64()).map(|d| d as i32);

        self.matches
            .link(match_id, real_game_id, payload, winner, duration)
            .await
            .map_err(OrchestratorError::Persistence)?;

        let (delta1, delta2) =
            rating_delta(record.average_skill_team1, record.average_skill_team2, winner);
        self.registry
            .broadcast(&OutboundEvent::MatchLinked(json!({
                "matchId": match_id,
                "realGameId": real_game_id,
                "winner": winner.map(|w| w as i16),
                "ratingDelta": { "team1": delta1, "team2": delta2 },
            })))
            .await;
        Ok(())
    }
}

/// Fixed Elo-style update applied to a completed match, exposed on
/// `match_linked` for an external profile service to apply. A
/// deterministic function of the two pre-match averages and the
/// observed winner.
fn rating_delta(average_skill_team1: f32, average_skill_team2: f32, winner: Option<Winner>) -> (f32, f32) {
    const K: f32 = 32.0;
    let expected_team1 =
        1.0 / (1.0 + 10f32.powf((average_skill_team2 - average_skill_team1) / 400.0));
    let actual_team1 = match winner {
        Some(Winner::Team1) => 1.0,
        Some(Winner::Team2) => 0.0,
        None => 0.5,
    };
    let delta1 = K * (actual_team1 - expected_team1);
    (delta1, -delta1)
}

/// `teamId=100` is blue (team 1), `teamId=200` is red (team 2);
/// whichever has `win=true`/`"Win"` wins.
fn detect_winner(payload: &serde_json::Value) -> Option<Winner> {
    let teams = payload.get("teams").and_then(|t| t.as_array())?;
    for team in teams {
        let team_id = team.get("teamId").and_then(|t| t.as_i64());
        let won = match team.get("win") {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("win"),
            _ => false,
        };
        if won {
            return match team_id {
                Some(100) => Some(Winner::Team1),
                Some(200) => Some(Winner::Team2),
                _ => None,
            };
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_winner_reads_blue_side_win_flag() {
        let payload = json!({
            "teams": [
                { "teamId": 100, "win": true },
                { "teamId": 200, "win": false },
            ],
        });
        assert_eq!(detect_winner(&payload), Some(Winner::Team1));
    }

    #[test]
    fn detect_winner_reads_string_win_value() {
        let payload = json!({
            "teams": [
                { "teamId": 100, "win": "Fail" },
                { "teamId": 200, "win": "Win" },
            ],
        });
        assert_eq!(detect_winner(&payload), Some(Winner::Team2));
    }

    #[test]
    fn detect_winner_none_when_no_team_won() {
        let payload = json!({ "teams": [{ "teamId": 100, "win": false }] });
        assert_eq!(detect_winner(&payload), None);
    }

    #[test]
    fn rating_delta_rewards_underdog_win() {
        let (delta1, delta2) = rating_delta(1000.0, 1400.0, Some(Winner::Team1));
        assert!(delta1 > 16.0);
        assert_eq!(delta1, -delta2);
    }

    #[test]
    fn rating_delta_even_skill_draw_is_zero() {
        let (delta1, delta2) = rating_delta(1200.0, 1200.0, None);
        assert_eq!(delta1, 0.0);
        assert_eq!(delta2, 0.0);
    }
}
