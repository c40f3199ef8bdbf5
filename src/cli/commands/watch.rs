//! Watch command: initial scan, then the tracker fed by a live watcher.

use anyhow::Context;
use tokio::sync::broadcast::error::RecvError;

use crate::config::Settings;
use crate::watcher::{ContentSession, ContentTracker, ContentWatcher, InitOutcome, TrackerEvent};

use super::print_report;

pub async fn run_watch(settings: &Settings) -> anyhow::Result<()> {
    let mut session = ContentSession::from_settings(settings)?;

    // Startup must fail loudly
    match session.init().await.context("Initial content scan failed")? {
        InitOutcome::NoContentDirectory => {
            eprintln!(
                "No content directory found at {}. Nothing to watch.",
                settings.content_root().display()
            );
            return Ok(());
        }
        InitOutcome::Ready(report) => print_report(&report),
    }

    let root = session.layout().root().to_path_buf();
    let (tracker, task) = ContentTracker::spawn(session, settings.content.debounce_ms);
    let mut events = tracker.subscribe();
    let watcher = ContentWatcher::start(&root, tracker.clone())?;

    eprintln!("Watching {} (Ctrl-C to stop)", root.display());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                crate::log_event!("watch", "interrupted");
                break;
            }
            event = events.recv() => match event {
                Ok(TrackerEvent::BatchProcessed(report)) => print_report(&report),
                Ok(TrackerEvent::BatchFailed(reason)) => eprintln!("error: {reason}"),
                Ok(TrackerEvent::ManifestWritten(_)) => {}
                Ok(TrackerEvent::Stopped) | Err(RecvError::Closed) => break,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[watch] missed {skipped} tracker notifications");
                }
            },
        }
    }

    watcher.stop().await;
    // Already stopped if the tracker ended on its own
    let _ = tracker.shutdown();
    task.await.context("Tracker task failed")?;
    Ok(())
}
