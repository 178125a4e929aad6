mod balancer;

pub use balancer::BalancedMatch;

use crate::draft::Lane;
use crate::identity::Identity;
use tokio::sync::Mutex;

/// One queued player awaiting a 10th teammate.
#[derive(Clone, Debug)]
pub struct QueuedPlayer {
    pub identity: Identity,
    pub primary_lane: Lane,
    pub secondary_lane: Lane,
    pub skill_rating: f32,
}

/// Accepts `join`/`leave` and pops a balanced 10-player match once
/// full. A single FIFO queue; no lane-specific sub-queues.
#[derive(Default)]
pub struct Queue {
    waiting: Mutex<Vec<QueuedPlayer>>,
}

impl Queue {
    /// Enqueues `player`; if this is the 10th, drains the queue and
    /// returns the balanced match. Re-joining replaces any prior entry
    /// for the same identity.
    pub async fn join(&self, player: QueuedPlayer) -> Option<BalancedMatch> {
        let mut waiting = self.waiting.lock().await;
        waiting.retain(|p| p.identity != player.identity);
        waiting.push(player);
        if waiting.len() < 10 {
            return None;
        }
        let batch: Vec<QueuedPlayer> = waiting.drain(0..10).collect();
        Some(balancer::balance(batch))
    }

    pub async fn leave(&self, identity: &Identity) -> bool {
        let mut waiting = self.waiting.lock().await;
        let before = waiting.len();
        waiting.retain(|p| &p.identity != identity);
        waiting.len() != before
    }

    pub async fn size(&self) -> usize {
        self.waiting.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str) -> QueuedPlayer {
        QueuedPlayer {
            identity: Identity::from(name),
            primary_lane: Lane::Top,
            secondary_lane: Lane::Jungle,
            skill_rating: 1200.0,
        }
    }

    #[tokio::test]
    async fn fires_only_once_ten_players_have_joined() {
        let queue = Queue::default();
        for i in 0..9 {
            assert!(queue.join(player(&format!("p{i}"))).await.is_none());
        }
        assert_eq!(queue.size().await, 9);
        let balanced = queue.join(player("p9")).await;
        assert!(balanced.is_some());
        assert_eq!(queue.size().await, 0);
    }

    #[tokio::test]
    async fn rejoining_replaces_the_existing_entry() {
        let queue = Queue::default();
        queue.join(player("dup")).await;
        queue.join(player("dup")).await;
        assert_eq!(queue.size().await, 1);
    }

    #[tokio::test]
    async fn leave_removes_a_waiting_player() {
        let queue = Queue::default();
        queue.join(player("solo")).await;
        assert!(queue.leave(&Identity::from("solo")).await);
        assert_eq!(queue.size().await, 0);
        assert!(!queue.leave(&Identity::from("solo")).await);
    }
}
