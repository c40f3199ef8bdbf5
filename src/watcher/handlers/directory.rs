//! Handler for first-level directory events.
//!
//! The only place collections are created or destroyed.

use async_trait::async_trait;

use crate::content::{ChangeKind, ContentEvent, FileKind};
use crate::watcher::{EventHandler, EventOutcome, TrackerState};

#[derive(Debug, Default)]
pub struct CollectionDirHandler;

#[async_trait]
impl EventHandler for CollectionDirHandler {
    fn name(&self) -> &str {
        "collection"
    }

    fn matches(&self, kind: &FileKind) -> bool {
        matches!(kind, FileKind::Collection { .. })
    }

    async fn handle(
        &self,
        event: &ContentEvent,
        kind: &FileKind,
        state: &mut TrackerState,
    ) -> EventOutcome {
        let FileKind::Collection { name } = kind else {
            return EventOutcome::unchanged();
        };

        match event.kind {
            ChangeKind::AddDir => {
                let added = state.collections.add_collection(name);
                if added {
                    crate::log_event!(self.name(), "added", "{name}");
                }
                EventOutcome::changed(added)
            }
            ChangeKind::UnlinkDir => {
                let removed = state.collections.remove_collection(name).is_some();
                if removed {
                    crate::log_event!(self.name(), "removed", "{name}");
                }
                EventOutcome::changed(removed)
            }
            _ => EventOutcome::unchanged(),
        }
    }
}
