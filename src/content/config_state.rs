//! Observable state of the content config.
//!
//! Only the tracker writes to it, in response to config-file events.
//! Readers either poll [`ConfigObserver::get`] or hold a
//! [`watch::Receiver`] from [`ConfigObserver::subscribe`].

use std::sync::Arc;

use tokio::sync::watch;

use super::loader::{ConfigLoadError, ContentDefinition};

#[derive(Debug, Clone, Default)]
pub enum ConfigStatus {
    #[default]
    Unloaded,
    Loading,
    Loaded(Arc<ContentDefinition>),
    DoesNotExist,
    Error(Arc<ConfigLoadError>),
}

impl ConfigStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConfigStatus::Unloaded => "unloaded",
            ConfigStatus::Loading => "loading",
            ConfigStatus::Loaded(_) => "loaded",
            ConfigStatus::DoesNotExist => "does-not-exist",
            ConfigStatus::Error(_) => "error",
        }
    }

    pub fn definition(&self) -> Option<&ContentDefinition> {
        match self {
            ConfigStatus::Loaded(def) => Some(def),
            _ => None,
        }
    }
}

/// Holder of the current [`ConfigStatus`].
#[derive(Debug, Clone)]
pub struct ConfigObserver {
    sender: Arc<watch::Sender<ConfigStatus>>,
}

impl Default for ConfigObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigObserver {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ConfigStatus::Unloaded);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Current status (cloned; cheap because payloads are `Arc`s).
    pub fn get(&self) -> ConfigStatus {
        self.sender.borrow().clone()
    }

    pub fn set(&self, status: ConfigStatus) {
        crate::debug_event!("config", "status", "{}", status.label());
        self.sender.send_replace(status);
    }

    pub fn subscribe(&self) -> watch::Receiver<ConfigStatus> {
        self.sender.subscribe()
    }

    /// The loaded definition, the load error, or `None` when nothing is
    /// loaded yet. Load failures surface here rather than at event time.
    pub fn definition(&self) -> Result<Option<Arc<ContentDefinition>>, Arc<ConfigLoadError>> {
        match self.get() {
            ConfigStatus::Loaded(def) => Ok(Some(def)),
            ConfigStatus::Error(err) => Err(err),
            _ => Ok(None),
        }
    }
}
