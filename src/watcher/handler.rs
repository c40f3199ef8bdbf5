//! Handler trait and outcome types for the content tracker.

use async_trait::async_trait;

use crate::content::{CollectionMap, ConfigObserver, ContentError, ContentEvent, FileKind};

/// State a tracking session owns and handlers mutate.
#[derive(Debug, Default)]
pub struct TrackerState {
    pub collections: CollectionMap,
    pub config: ConfigObserver,
}

/// Result of handling one event.
///
/// `regenerate` is OR-ed across a batch; `error` is reported but never
/// stops the remaining events from being processed.
#[derive(Debug, Default)]
pub struct EventOutcome {
    pub regenerate: bool,
    pub error: Option<ContentError>,
}

impl EventOutcome {
    /// Nothing changed.
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// The manifest must be rewritten.
    pub fn regenerate() -> Self {
        Self::changed(true)
    }

    pub fn changed(regenerate: bool) -> Self {
        Self {
            regenerate,
            error: None,
        }
    }

    /// The event was skipped or failed.
    pub fn failed(error: ContentError) -> Self {
        Self {
            regenerate: false,
            error: Some(error),
        }
    }
}

/// Trait for handlers that apply classified events to the tracker state.
///
/// Handlers declare which classifications they care about; the session
/// routes each event to the first matching handler.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handler name for logging.
    fn name(&self) -> &str;

    /// Check if this handler should process events of the given kind.
    fn matches(&self, kind: &FileKind) -> bool;

    /// Apply the event to the state.
    async fn handle(
        &self,
        event: &ContentEvent,
        kind: &FileKind,
        state: &mut TrackerState,
    ) -> EventOutcome;
}
