use crate::identity::Identity;
use crate::record::MatchId;
use crate::record::MatchRecord;
use crate::record::MatchStatus;
use crate::record::Winner;
use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::Row;

/// Transactional CRUD over the `matches` table.
pub struct MatchStore {
    client: Arc<Client>,
    owner_backend_id: String,
}

impl MatchStore {
    pub fn new(client: Arc<Client>, owner_backend_id: impl Into<String>) -> Self {
        Self { client, owner_backend_id: owner_backend_id.into() }
    }

    fn from_row(row: &Row) -> anyhow::Result<MatchRecord> {
        let status = MatchStatus::parse(row.get::<_, &str>("status"))
            .ok_or_else(|| anyhow::anyhow!("unknown match status in row"))?;
        let team1: Vec<String> = serde_json::from_value(row.get("team1_players"))?;
        let team2: Vec<String> = serde_json::from_value(row.get("team2_players"))?;
        Ok(MatchRecord {
            id: row.get("id"),
            status,
            team1_players: team1.iter().map(|s| Identity::from(s.as_str())).collect(),
            team2_players: team2.iter().map(|s| Identity::from(s.as_str())).collect(),
            average_skill_team1: row.get("average_skill_team1"),
            average_skill_team2: row.get("average_skill_team2"),
            draft_json: row.get("draft_json"),
            game_json: row.get("game_json"),
            real_game_json: row.get("real_game_json"),
            linked_real_game_id: row.get("linked_real_game_id"),
            actual_winner: row.get::<_, Option<i16>>("actual_winner").map(|w| {
                if w == 1 { Winner::Team1 } else { Winner::Team2 }
            }),
            actual_duration: row.get("actual_duration"),
            owner_backend_id: row.get("owner_backend_id"),
            owner_heartbeat: row.get("owner_heartbeat"),
            created_at: row.get("created_at"),
            completed_at: row.get("completed_at"),
        })
    }

    pub async fn create(
        &self,
        team1_players: Vec<Identity>,
        team2_players: Vec<Identity>,
        average_skill_team1: f32,
        average_skill_team2: f32,
    ) -> anyhow::Result<MatchRecord> {
        let now = crate::record::now_ms();
        let team1_json = serde_json::to_value(
            team1_players.iter().map(|i| i.canonical()).collect::<Vec<_>>(),
        )?;
        let team2_json = serde_json::to_value(
            team2_players.iter().map(|i| i.canonical()).collect::<Vec<_>>(),
        )?;
        let row = self
            .client
            .query_one(
                "INSERT INTO matches
                    (id, status, team1_players, team2_players,
                     average_skill_team1, average_skill_team2,
                     owner_backend_id, owner_heartbeat, created_at)
                 VALUES (nextval('matches_id_seq'), 'draft', $1, $2, $3, $4, $5, $6, $7)
                 RETURNING *",
                &[
                    &team1_json,
                    &team2_json,
                    &average_skill_team1,
                    &average_skill_team2,
                    &self.owner_backend_id,
                    &now,
                    &now,
                ],
            )
            .await?;
        Self::from_row(&row)
    }

    pub async fn get(&self, id: MatchId) -> anyhow::Result<Option<MatchRecord>> {
        let row = self
            .client
            .query_opt("SELECT * FROM matches WHERE id = $1", &[&id])
            .await?;
        row.as_ref().map(Self::from_row).transpose()
    }

    pub async fn set_draft_json(&self, id: MatchId, draft_json: serde_json::Value) -> anyhow::Result<()> {
        self.client
            .execute(
                "UPDATE matches SET draft_json = $1 WHERE id = $2",
                &[&draft_json, &id],
            )
            .await?;
        Ok(())
    }

    pub async fn set_status(&self, id: MatchId, status: MatchStatus) -> anyhow::Result<()> {
        self.client
            .execute(
                "UPDATE matches SET status = $1 WHERE id = $2",
                &[&status.as_str(), &id],
            )
            .await?;
        Ok(())
    }

    pub async fn set_game_json(
        &self,
        id: MatchId,
        status: MatchStatus,
        game_json: serde_json::Value,
    ) -> anyhow::Result<()> {
        self.client
            .execute(
                "UPDATE matches SET status = $1, game_json = $2 WHERE id = $3",
                &[&status.as_str(), &game_json, &id],
            )
            .await?;
        Ok(())
    }

    pub async fn cancel(&self, id: MatchId) -> anyhow::Result<()> {
        self.set_status(id, MatchStatus::Cancelled).await
    }

    /// Atomically sets the linking fields together.
    pub async fn link(
        &self,
        id: MatchId,
        real_game_id: &str,
        real_game_json: serde_json::Value,
        winner: Option<Winner>,
        duration: Option<i32>,
    ) -> anyhow::Result<()> {
        let now = crate::record::now_ms();
        self.client
            .execute(
                "UPDATE matches SET
                    linked_real_game_id = $1,
                    real_game_json = $2,
                    actual_winner = $3,
                    actual_duration = $4,
                    status = 'completed',
                    completed_at = $5
                 WHERE id = $6",
                &[
                    &real_game_id,
                    &real_game_json,
                    &winner.map(|w| w as i16),
                    &duration,
                    &now,
                    &id,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn heartbeat(&self, id: MatchId) -> anyhow::Result<()> {
        self.client
            .execute(
                "UPDATE matches SET owner_backend_id = $1, owner_heartbeat = $2 WHERE id = $3",
                &[&self.owner_backend_id, &crate::record::now_ms(), &id],
            )
            .await?;
        Ok(())
    }

    /// Non-terminal matches, used by the cold-start restore scan.
    pub async fn active(&self) -> anyhow::Result<Vec<MatchRecord>> {
        let rows = self
            .client
            .query(
                "SELECT * FROM matches WHERE status IN ('draft', 'game_ready', 'in_progress')
                 ORDER BY id",
                &[],
            )
            .await?;
        rows.iter().map(Self::from_row).collect()
    }

    /// Most recent non-terminal match containing `identity` on its
    /// roster.
    pub async fn active_for(&self, identity: &Identity) -> anyhow::Result<Option<MatchRecord>> {
        let canonical = identity.canonical();
        let rows = self
            .client
            .query(
                "SELECT * FROM matches
                 WHERE status IN ('draft', 'game_ready', 'in_progress')
                   AND (team1_players @> to_jsonb($1::text) OR team2_players @> to_jsonb($1::text))
                 ORDER BY id DESC LIMIT 1",
                &[&canonical],
            )
            .await?;
        match rows.first() {
            Some(row) => Ok(Some(Self::from_row(row)?)),
            None => Ok(self.active_for_fallback(identity).await?),
        }
    }

    /// Case-insensitive fallback scan when the exact JSONB containment
    /// match misses.
    async fn active_for_fallback(&self, identity: &Identity) -> anyhow::Result<Option<MatchRecord>> {
        for record in self.active().await? {
            if record.roster().any(|p| p == identity) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}
