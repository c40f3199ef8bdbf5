//! Batching debouncer for content change events.
//!
//! A burst of filesystem events (mass rename, editor save dance) is
//! coalesced into a single processing pass. Every recorded event pushes the
//! deadline out by the full window; the batch is released only once the
//! stream has been quiet for that long.

use std::time::Duration;

use tokio::time::Instant;

use crate::content::ContentEvent;

/// Append-only queue with a resettable deadline.
///
/// Unlike per-path debouncing, order is preserved and nothing is
/// de-duplicated: later events in a batch can depend on collection state
/// created by earlier ones.
#[derive(Debug)]
pub struct BatchDebouncer {
    /// Pending events in arrival order.
    pending: Vec<ContentEvent>,
    /// Quiet period required before a batch is released.
    window: Duration,
    /// When the current batch becomes ready, if any events are pending.
    deadline: Option<Instant>,
}

impl BatchDebouncer {
    /// Create a new debouncer with the given window in milliseconds.
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            pending: Vec::new(),
            window: Duration::from_millis(debounce_ms),
            deadline: None,
        }
    }

    /// Queue an event and restart the window.
    pub fn record(&mut self, event: ContentEvent) {
        self.pending.push(event);
        self.deadline = Some(Instant::now() + self.window);
    }

    /// Deadline of the scheduled run, `None` when nothing is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_ready(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Drain the queue atomically, cancelling the scheduled run.
    pub fn take(&mut self) -> Vec<ContentEvent> {
        self.deadline = None;
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
