//! The tracker actor.
//!
//! One task owns the [`ContentSession`] and its queue. Callers hold a
//! [`TrackerHandle`] and can only enqueue events, ask for a snapshot or
//! request shutdown; they never touch the collection map directly.
//!
//! ```text
//! fs watcher ──enqueue──> [ mpsc ] ──> ContentTracker
//!                                       - BatchDebouncer (deadline)
//!                                       - ContentSession::run_batch
//!                                       - TrackerBroadcaster
//! ```
//!
//! While a batch is running (for example while the content config is being
//! loaded) new events simply wait in the channel and are picked up by the
//! next batch.

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::sleep_until;

use crate::content::{CollectionMap, ConfigStatus, ContentEvent};

use super::debouncer::BatchDebouncer;
use super::error::WatchError;
use super::notifications::{TrackerBroadcaster, TrackerEvent};
use super::session::ContentSession;

/// Point-in-time copy of the tracker state.
#[derive(Debug, Clone)]
pub struct TrackerSnapshot {
    pub collections: CollectionMap,
    pub config: ConfigStatus,
    /// Events queued but not yet processed.
    pub pending: usize,
}

enum TrackerCommand {
    Event(ContentEvent),
    Snapshot(oneshot::Sender<TrackerSnapshot>),
    Shutdown,
}

/// Cloneable handle to a running tracker.
#[derive(Clone)]
pub struct TrackerHandle {
    commands: mpsc::UnboundedSender<TrackerCommand>,
    broadcaster: TrackerBroadcaster,
}

impl TrackerHandle {
    /// Queue a raw event; processing is debounced.
    pub fn enqueue(&self, event: ContentEvent) -> Result<(), WatchError> {
        self.commands
            .send(TrackerCommand::Event(event))
            .map_err(|_| WatchError::ChannelClosed)
    }

    /// Current state, answered between batches.
    pub async fn snapshot(&self) -> Result<TrackerSnapshot, WatchError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(TrackerCommand::Snapshot(tx))
            .map_err(|_| WatchError::ChannelClosed)?;
        rx.await.map_err(|_| WatchError::ChannelClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.broadcaster.subscribe()
    }

    /// Ask the tracker to flush pending events and stop.
    pub fn shutdown(&self) -> Result<(), WatchError> {
        self.commands
            .send(TrackerCommand::Shutdown)
            .map_err(|_| WatchError::ChannelClosed)
    }
}

pub struct ContentTracker {
    session: ContentSession,
    debouncer: BatchDebouncer,
    commands: mpsc::UnboundedReceiver<TrackerCommand>,
    broadcaster: TrackerBroadcaster,
}

impl ContentTracker {
    /// Spawn the actor on the current runtime.
    ///
    /// The session should already be initialised; the tracker only runs
    /// debounced batches.
    pub fn spawn(
        session: ContentSession,
        debounce_ms: u64,
    ) -> (TrackerHandle, JoinHandle<ContentSession>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let broadcaster = TrackerBroadcaster::default();

        let tracker = ContentTracker {
            session,
            debouncer: BatchDebouncer::new(debounce_ms),
            commands: rx,
            broadcaster: broadcaster.clone(),
        };
        let handle = TrackerHandle {
            commands: tx,
            broadcaster,
        };

        (handle, tokio::spawn(tracker.run()))
    }

    /// Main loop. Returns the session so callers can inspect final state.
    async fn run(mut self) -> ContentSession {
        crate::log_event!("tracker", "started");

        loop {
            let deadline = self.debouncer.deadline();

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(TrackerCommand::Event(event)) => {
                        crate::debug_event!("tracker", "queued", "{event}");
                        self.debouncer.record(event);
                    }
                    Some(TrackerCommand::Snapshot(reply)) => {
                        let _ = reply.send(self.snapshot());
                    }
                    Some(TrackerCommand::Shutdown) | None => break,
                },

                _ = sleep_until_deadline(deadline), if deadline.is_some() => {
                    self.flush().await;
                }
            }
        }

        if self.debouncer.has_pending() {
            self.flush().await;
        }
        self.broadcaster.send(TrackerEvent::Stopped);
        crate::log_event!("tracker", "stopped");
        self.session
    }

    /// Run one batch. Errors are reported and swallowed so the watch
    /// process keeps going.
    async fn flush(&mut self) {
        let events = self.debouncer.take();
        if events.is_empty() {
            return;
        }

        match self.session.run_batch(events).await {
            Ok(report) => {
                if let Some(path) = &report.manifest {
                    self.broadcaster
                        .send(TrackerEvent::ManifestWritten(path.clone()));
                }
                self.broadcaster.send(TrackerEvent::BatchProcessed(report));
            }
            Err(e) => {
                tracing::error!("[tracker] batch failed: {e}");
                self.broadcaster.send(TrackerEvent::BatchFailed(e.to_string()));
            }
        }
    }

    fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            collections: self.session.collections().clone(),
            config: self.session.config().get(),
            pending: self.debouncer.pending_count(),
        }
    }
}

async fn sleep_until_deadline(deadline: Option<tokio::time::Instant>) {
    if let Some(deadline) = deadline {
        sleep_until(deadline).await;
    }
}
