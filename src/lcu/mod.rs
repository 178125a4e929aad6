use crate::error::LcuError;
use crate::identity::Identity;
use crate::registry::InboundEvent;
use crate::registry::OutboundEvent;
use crate::registry::Registry;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

/// Per-RPC deadline.
const RPC_TIMEOUT: Duration = Duration::from_secs(8);

/// Routes server-originated LCU queries to whichever connected client
/// session can proxy them to its local game client. Not an LCU client
/// itself -- a request router over an existing session.
#[derive(Default)]
pub struct LcuGateway {
    pending: Mutex<HashMap<String, oneshot::Sender<Value>>>,
    counter: AtomicU64,
}

impl LcuGateway {
    fn correlation_id(&self) -> String {
        format!("lcu-{}", self.counter.fetch_add(1, Ordering::Relaxed))
    }

    /// Called from the push-channel handler when a client answers an
    /// outstanding RPC with `InboundEvent::LcuReply`.
    pub fn resolve(&self, event: &InboundEvent) {
        if let InboundEvent::LcuReply { correlation_id, payload } = event
            && let Some(tx) = self.pending.lock().expect("lock").remove(correlation_id)
        {
            let _ = tx.send(payload.clone());
        }
    }

    async fn rpc(
        &self,
        registry: &Registry,
        identity: &Identity,
        kind: &str,
        count: Option<u32>,
        game_id: Option<String>,
    ) -> Result<Value, LcuError> {
        let session = registry
            .lcu_session_for(identity)
            .await
            .ok_or(LcuError::Unreachable)?;
        let correlation_id = self.correlation_id();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().expect("lock").insert(correlation_id.clone(), tx);
        session.send(&OutboundEvent::LcuRequest {
            correlation_id: correlation_id.clone(),
            kind: kind.to_string(),
            count,
            game_id,
        });
        match tokio::time::timeout(RPC_TIMEOUT, rx).await {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(_)) => Err(LcuError::Unreachable),
            Err(_) => {
                self.pending.lock().expect("lock").remove(&correlation_id);
                Err(LcuError::Timeout)
            }
        }
    }

    /// `kind="recent"` -> summary list; `kind="details"` -> full payload
    /// for a specific external game id.
    pub async fn fetch_match_history_for(
        &self,
        registry: &Registry,
        identity: &Identity,
        kind: &str,
        count: Option<u32>,
    ) -> Result<Value, LcuError> {
        self.rpc(registry, identity, kind, count, None).await
    }

    pub async fn fetch_game_details(
        &self,
        registry: &Registry,
        identity: &Identity,
        game_id: &str,
    ) -> Result<Value, LcuError> {
        self.rpc(registry, identity, "details", None, Some(game_id.to_string())).await
    }

    /// Composes `recent` + filter-by-custom + parallel `details` fetch.
    pub async fn get_custom_games_with_details(
        &self,
        registry: &Registry,
        identity: &Identity,
        count: u32,
    ) -> Result<Vec<Value>, LcuError> {
        let recent = self
            .fetch_match_history_for(registry, identity, "recent", Some(count))
            .await?;
        let games = recent
            .get("games")
            .and_then(|g| g.as_array())
            .cloned()
            .unwrap_or_default();
        let custom_ids: Vec<String> = games
            .iter()
            .filter(|g| {
                g.get("gameType").and_then(|t| t.as_str()) == Some("CUSTOM_GAME")
            })
            .filter_map(|g| g.get("gameId").and_then(|id| id.as_str()).map(str::to_string))
            .collect();

        let fetches = custom_ids
            .iter()
            .map(|id| self.fetch_game_details(registry, identity, id));
        let results = futures::future::join_all(fetches).await;
        let mut details = Vec::with_capacity(custom_ids.len());
        for (id, result) in custom_ids.into_iter().zip(results) {
            match result {
                Ok(payload) => details.push(payload),
                Err(e) => log::warn!("failed to fetch details for {id}: {e}"),
            }
        }
        Ok(details)
    }
}
