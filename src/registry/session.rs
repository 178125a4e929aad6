use crate::identity::Identity;
use crate::registry::envelope::OutboundEvent;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::time::Instant;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;

pub type SessionId = u64;

/// Bounded per-session outbound queue: if a session's consumer stalls
/// and this many messages pile up unread, the session is closed instead
/// of growing the queue without bound.
pub const QUEUE_CAPACITY: usize = 256;

/// One connected client. Anonymous until `identify` names a player.
pub struct Session {
    pub id: SessionId,
    sender: Sender<String>,
    alive: AtomicBool,
    identified_player: Mutex<Option<Identity>>,
    lcu_reachable: AtomicBool,
    last_ping_at: Mutex<Instant>,
}

impl Session {
    pub fn new(id: SessionId, sender: Sender<String>) -> Self {
        Self {
            id,
            sender,
            alive: AtomicBool::new(true),
            identified_player: Mutex::new(None),
            lcu_reachable: AtomicBool::new(false),
            last_ping_at: Mutex::new(Instant::now()),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    fn mark_dead(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }

    /// Best-effort send. A full queue (consumer can't keep up) or a
    /// closed channel both kill the session rather than stall the caller.
    pub fn send(&self, event: &OutboundEvent) {
        match self.sender.try_send(event.to_json()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::warn!("session {} outbound queue overflow, closing", self.id);
                self.mark_dead();
            }
            Err(TrySendError::Closed(_)) => {
                log::warn!("session {} send failed, marking dead", self.id);
                self.mark_dead();
            }
        }
    }

    pub fn identified_player(&self) -> Option<Identity> {
        self.identified_player.lock().expect("lock").clone()
    }

    pub fn identify(&self, identity: Identity) {
        *self.identified_player.lock().expect("lock") = Some(identity);
    }

    pub fn lcu_reachable(&self) -> bool {
        self.lcu_reachable.load(Ordering::Relaxed)
    }

    pub fn set_lcu_reachable(&self, reachable: bool) {
        self.lcu_reachable.store(reachable, Ordering::Relaxed);
    }

    pub fn touch(&self) {
        *self.last_ping_at.lock().expect("lock") = Instant::now();
    }

    /// Dead if no inbound traffic for `timeout`.
    pub fn expired(&self, timeout: std::time::Duration) -> bool {
        self.last_ping_at.lock().expect("lock").elapsed() > timeout
    }
}
