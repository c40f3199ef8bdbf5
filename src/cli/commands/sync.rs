//! Sync command: one initial scan and manifest write.

use anyhow::Context;

use crate::config::Settings;
use crate::watcher::{ContentSession, InitOutcome};

use super::print_report;

pub async fn run_sync(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let mut session = ContentSession::from_settings(settings)?;

    let outcome = session
        .init()
        .await
        .with_context(|| format!("Failed to sync {}", settings.content_root().display()))?;

    match outcome {
        InitOutcome::NoContentDirectory => {
            eprintln!(
                "No content directory found at {}. Skipping.",
                settings.content_root().display()
            );
        }
        InitOutcome::Ready(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
                println!(
                    "Synced {} collections, {} entries",
                    session.collections().len(),
                    session.collections().entry_count()
                );
            }
        }
    }

    Ok(())
}
