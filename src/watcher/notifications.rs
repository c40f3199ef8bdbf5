//! Broadcast of tracker activity to any number of listeners.

use std::path::PathBuf;
use tokio::sync::broadcast;

use super::session::BatchReport;

#[derive(Debug, Clone)]
pub enum TrackerEvent {
    /// A debounced batch finished processing.
    BatchProcessed(BatchReport),
    /// The manifest was rewritten.
    ManifestWritten(PathBuf),
    /// A batch could not be completed. The manifest write is retried with
    /// the next batch.
    BatchFailed(String),
    /// The tracker stopped; no further events follow.
    Stopped,
}

/// Fan-out of [`TrackerEvent`]s.
#[derive(Clone)]
pub struct TrackerBroadcaster {
    sender: broadcast::Sender<TrackerEvent>,
}

impl TrackerBroadcaster {
    /// Create a new broadcaster with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn send(&self, event: TrackerEvent) {
        match self.sender.send(event) {
            Ok(count) => {
                crate::debug_event!("broadcast", "sent", "to {count} subscribers");
            }
            Err(_) => {
                // No receivers
                crate::debug_event!("broadcast", "dropped", "no subscribers");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.sender.subscribe()
    }
}

impl Default for TrackerBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}
