//! Notifications pushed from the timer to whatever host is displaying it.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::StudySession;
use crate::timer::TimerSnapshot;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum TimerEvent {
    /// Start, pause, resync, reset or save changed the timer.
    StateChanged(TimerSnapshot),
    /// Periodic display refresh while running.
    Tick(TimerSnapshot),
    /// Lower-frequency liveness signal while running.
    Heartbeat(TimerSnapshot),
    SessionSaved(StudySession),
}

pub trait TimerEventSink: Send + Sync {
    fn emit(&self, event: TimerEvent);
}

/// Drops every event. For headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl TimerEventSink for NoopSink {
    fn emit(&self, _event: TimerEvent) {}
}

/// Fans events out to any number of subscribers. Slow subscribers miss
/// events rather than block the timer.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<TimerEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.sender.subscribe()
    }
}

impl TimerEventSink for BroadcastSink {
    fn emit(&self, event: TimerEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }
}
