use serde::Serialize;
use serde_json::Value;

/// Outbound JSON envelopes `{type, ...payload}`. One variant per
/// required type; `Serialize` tags each with its `type` field so every
/// payload shape stays self-describing on the wire.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    #[serde(rename = "draft_updated")]
    DraftUpdated(Value),
    #[serde(rename = "draft_confirmation_update")]
    DraftConfirmationUpdate(Value),
    #[serde(rename = "game_started")]
    GameStarted(Value),
    #[serde(rename = "match_vote_update")]
    MatchVoteUpdate(Value),
    #[serde(rename = "match_linked")]
    MatchLinked(Value),
    #[serde(rename = "special_user_vote")]
    SpecialUserVote(Value),
    #[serde(rename = "discord_users")]
    DiscordUsers(Value),
    #[serde(rename = "discord_status")]
    DiscordStatus(Value),
    #[serde(rename = "match_found")]
    MatchFound(Value),
    #[serde(rename = "error")]
    Error { correlation_id: Option<String>, error: String },
    /// Server -> client RPC request, proxied through the client's LCU
    /// connection and answered with `InboundEvent::LcuReply`.
    #[serde(rename = "lcu_request")]
    LcuRequest { correlation_id: String, kind: String, count: Option<u32>, game_id: Option<String> },
}

impl OutboundEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("envelope always serializes")
    }
}

/// Inbound messages accepted on the push channel.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Identify { player_id: Option<String>, summoner_name: String },
    Ping,
    /// Reply to a server-originated LCU RPC, correlated by id.
    LcuReply { correlation_id: String, payload: Value },
    LcuReachable { reachable: bool },
}
