mod envelope;
mod session;

pub use envelope::InboundEvent;
pub use envelope::OutboundEvent;
pub use session::Session;
pub use session::SessionId;
pub use session::QUEUE_CAPACITY;

use crate::identity::Identity;
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::sync::RwLock;

/// A session with no inbound traffic for this long is reaped.
const SESSION_TIMEOUT: Duration = Duration::from_secs(90);

/// Tracks every connected client, maps identities to sessions, and fans
/// out server-originated events.
#[derive(Default)]
pub struct Registry {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    next_id: AtomicU64,
}

impl Registry {
    /// Registers a freshly accepted connection and returns its handle.
    pub async fn register(&self, sender: Sender<String>) -> Arc<Session> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Arc::new(Session::new(id, sender));
        self.sessions.write().await.insert(id, session.clone());
        session
    }

    pub async fn remove(&self, id: SessionId) {
        self.sessions.write().await.remove(&id);
    }

    /// Enumerates live sessions as a snapshot.
    pub async fn all(&self) -> Vec<Arc<Session>> {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.is_alive())
            .cloned()
            .collect()
    }

    pub async fn by_identity(&self, identity: &Identity) -> Vec<Arc<Session>> {
        self.all()
            .await
            .into_iter()
            .filter(|s| s.identified_player().as_ref() == Some(identity))
            .collect()
    }

    /// Any live session for `identity` that can proxy an LCU RPC.
    pub async fn lcu_session_for(&self, identity: &Identity) -> Option<Arc<Session>> {
        self.by_identity(identity)
            .await
            .into_iter()
            .find(|s| s.lcu_reachable())
    }

    pub async fn send(&self, session: &Session, event: &OutboundEvent) {
        session.send(event);
    }

    /// Fan-out to every live session. Failures are swallowed per
    /// session; the failing session is marked dead and reaped on the
    /// next sweep.
    pub async fn broadcast(&self, event: &OutboundEvent) {
        for session in self.all().await {
            session.send(event);
        }
    }

    pub async fn broadcast_to(&self, identities: &[Identity], event: &OutboundEvent) {
        for session in self.all().await {
            if let Some(player) = session.identified_player()
                && identities.contains(&player)
            {
                session.send(event);
            }
        }
    }

    /// Reaps dead or expired sessions. Called from the Scheduler tick.
    pub async fn sweep(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|id, session| {
            let keep = session.is_alive() && !session.expired(SESSION_TIMEOUT);
            if !keep {
                log::info!("reaping session {id}");
            }
            keep
        });
    }

    /// Derived "users online" list broadcast on identity change.
    pub async fn broadcast_users_online(&self) {
        let names: Vec<String> = self
            .all()
            .await
            .into_iter()
            .filter_map(|s| s.identified_player())
            .map(|i| i.canonical())
            .collect();
        self.broadcast(&OutboundEvent::DiscordUsers(serde_json::json!({ "users": names })))
            .await;
    }
}
