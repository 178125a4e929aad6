use crate::coordinator::Coordinator;
use std::sync::Arc;
use std::time::Duration;

/// The single driver behind every time-based trigger. Ticks at a fixed
/// interval; per-action and confirmation timeouts are derived from
/// timestamps on each tick, never from a timer spawned per action.
const TICK_INTERVAL: Duration = Duration::from_millis(1_000);

pub fn spawn(coordinator: Arc<Coordinator>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            coordinator.tick_drafts().await;
            coordinator.registry.sweep().await;
            coordinator.heartbeat_active_matches().await;
        }
    });
}
