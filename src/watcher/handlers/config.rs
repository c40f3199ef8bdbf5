//! Handler for content-config file changes.
//!
//! Drives the config observable through `loading` into its settled state.
//! Always asks for regeneration because collection types depend on the
//! config.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::content::{ConfigStatus, ContentConfigLoader, ContentEvent, FileKind};
use crate::watcher::{EventHandler, EventOutcome, TrackerState};

pub struct ConfigFileHandler {
    /// Path to the content config file.
    config_path: PathBuf,
    loader: Arc<dyn ContentConfigLoader>,
}

impl ConfigFileHandler {
    pub fn new(config_path: PathBuf, loader: Arc<dyn ContentConfigLoader>) -> Self {
        Self {
            config_path,
            loader,
        }
    }
}

#[async_trait]
impl EventHandler for ConfigFileHandler {
    fn name(&self) -> &str {
        "config"
    }

    fn matches(&self, kind: &FileKind) -> bool {
        matches!(kind, FileKind::Config)
    }

    async fn handle(
        &self,
        event: &ContentEvent,
        _kind: &FileKind,
        state: &mut TrackerState,
    ) -> EventOutcome {
        crate::log_event!(self.name(), event.kind, "{}", self.config_path.display());
        state.config.set(ConfigStatus::Loading);

        let status = match self.loader.load(&self.config_path).await {
            Ok(Some(definition)) => {
                crate::log_event!(
                    self.name(),
                    "loaded",
                    "{} collections",
                    definition.collections.len()
                );
                ConfigStatus::Loaded(Arc::new(definition))
            }
            Ok(None) => ConfigStatus::DoesNotExist,
            Err(e) => {
                tracing::warn!("[{}] {e}", self.name());
                ConfigStatus::Error(Arc::new(e))
            }
        };
        state.config.set(status);

        EventOutcome::regenerate()
    }
}
