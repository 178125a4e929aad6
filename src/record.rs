use crate::identity::Identity;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

pub type MatchId = i64;

/// Match record `status`. Only `draft` and `in_progress` may revert to
/// `cancelled`; `completed` and `cancelled` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Queued,
    Draft,
    GameReady,
    InProgress,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Draft => "draft",
            Self::GameReady => "game_ready",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "queued" => Self::Queued,
            "draft" => Self::Draft,
            "game_ready" => Self::GameReady,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => return None,
        })
    }
}

/// Which side won, once known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum Winner {
    Team1 = 1,
    Team2 = 2,
}

/// The authoritative persisted record for one custom match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub status: MatchStatus,
    /// Ordered by assigned lane [top, jungle, mid, bot, support].
    pub team1_players: Vec<Identity>,
    pub team2_players: Vec<Identity>,
    pub average_skill_team1: f32,
    pub average_skill_team2: f32,
    /// Serialized draft state; the source of truth for reconstruction.
    pub draft_json: Option<Value>,
    /// Snapshot of the game record once status >= in_progress.
    pub game_json: Option<Value>,
    /// Full external real-game payload once linked.
    pub real_game_json: Option<Value>,
    pub linked_real_game_id: Option<String>,
    pub actual_winner: Option<Winner>,
    pub actual_duration: Option<i32>,
    pub owner_backend_id: String,
    pub owner_heartbeat: i64,
    pub created_at: i64,
    pub completed_at: Option<i64>,
}

impl MatchRecord {
    pub fn roster(&self) -> impl Iterator<Item = &Identity> {
        self.team1_players.iter().chain(self.team2_players.iter())
    }

    pub fn team_of(&self, identity: &Identity) -> Option<u8> {
        if self.team1_players.contains(identity) {
            Some(1)
        } else if self.team2_players.contains(identity) {
            Some(2)
        } else {
            None
        }
    }
}

pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_millis() as i64
}
