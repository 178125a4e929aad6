use crate::identity::Identity;
use crate::record::MatchId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_postgres::Client;

/// `match_votes`, unique on `(match_id, player_id)`. A new vote by the
/// same voter supersedes the previous one.
pub struct VoteStore {
    client: Arc<Client>,
}

impl VoteStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Upsert; idempotent past the write for identical `(voter, game)`.
    /// The voter's identity is normalized to a lower-cased key so that
    /// `Faker#KR1` and `faker#kr1` supersede the same row instead of
    /// double-counting in `tally()`.
    pub async fn vote(
        &self,
        match_id: MatchId,
        voter: &Identity,
        chosen_real_game_id: &str,
    ) -> anyhow::Result<()> {
        self.client
            .execute(
                "INSERT INTO match_votes (match_id, player_id, lcu_game_id, voted_at)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (match_id, player_id)
                 DO UPDATE SET lcu_game_id = EXCLUDED.lcu_game_id, voted_at = EXCLUDED.voted_at",
                &[&match_id, &normalized_key(voter), &chosen_real_game_id, &crate::record::now_ms()],
            )
            .await?;
        Ok(())
    }

    pub async fn remove(&self, match_id: MatchId, voter: &Identity) -> anyhow::Result<()> {
        self.client
            .execute(
                "DELETE FROM match_votes WHERE match_id = $1 AND player_id = $2",
                &[&match_id, &normalized_key(voter)],
            )
            .await?;
        Ok(())
    }

    /// Tally of votes per real-game id for the match.
    pub async fn tally(&self, match_id: MatchId) -> anyhow::Result<HashMap<String, u32>> {
        let rows = self
            .client
            .query(
                "SELECT lcu_game_id, COUNT(*) AS n FROM match_votes
                 WHERE match_id = $1 GROUP BY lcu_game_id",
                &[&match_id],
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.get::<_, String>("lcu_game_id"), row.get::<_, i64>("n") as u32))
            .collect())
    }

    pub async fn all_for(&self, match_id: MatchId) -> anyhow::Result<Vec<(Identity, String)>> {
        let rows = self
            .client
            .query(
                "SELECT player_id, lcu_game_id FROM match_votes WHERE match_id = $1",
                &[&match_id],
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    Identity::from(row.get::<_, String>("player_id").as_str()),
                    row.get::<_, String>("lcu_game_id"),
                )
            })
            .collect())
    }
}

fn normalized_key(identity: &Identity) -> String {
    identity.canonical().to_ascii_lowercase()
}
