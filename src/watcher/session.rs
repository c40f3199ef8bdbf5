//! A content tracking session: the collection map, the config observable,
//! the handlers that mutate them and the manifest they produce.
//!
//! `run_batch` processes its events strictly in order; later events may
//! depend on collections created earlier in the same batch. Debouncing and
//! queueing live in [`super::tracker`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Settings;
use crate::content::{
    CollectionMap, ConfigObserver, ConfigStatus, ContentConfigLoader, ContentError, ContentEvent,
    ContentLayout, FileKind, FrontmatterReader, ManifestWriter, TomlConfigLoader, YamlFrontmatter,
    classify,
};

use super::error::WatchError;
use super::handler::{EventHandler, EventOutcome, TrackerState};
use super::handlers::{CollectionDirHandler, ConfigFileHandler, EntryFileHandler};

/// Summary of one processing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Number of events processed.
    pub events: usize,
    /// Whether any event required regeneration.
    pub regenerated: bool,
    /// Manifest path, when it was written during this pass.
    pub manifest: Option<PathBuf>,
    /// Non-fatal problems: unsupported files, skipped entries, config drift.
    pub warnings: Vec<String>,
    /// Unexpected per-event failures (unreadable files, bad frontmatter).
    pub errors: Vec<String>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

/// Result of the initial synchronous scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Ready(BatchReport),
    /// The content root does not exist; nothing was tracked or written.
    NoContentDirectory,
}

pub struct ContentSession {
    layout: ContentLayout,
    state: TrackerState,
    handlers: Vec<Box<dyn EventHandler>>,
    writer: ManifestWriter,
    /// Set while the manifest lags the map, cleared by a successful write.
    dirty: bool,
}

impl ContentSession {
    pub fn builder(layout: ContentLayout) -> ContentSessionBuilder {
        ContentSessionBuilder::new(layout)
    }

    /// Session with the default handlers, loader and frontmatter reader.
    pub fn from_settings(settings: &Settings) -> Result<Self, WatchError> {
        Self::builder(ContentLayout::from_settings(settings))
            .manifest_path(settings.manifest_path())
            .config_import(settings.manifest.config_import.clone())
            .build()
    }

    pub fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    pub fn collections(&self) -> &CollectionMap {
        &self.state.collections
    }

    pub fn config(&self) -> &ConfigObserver {
        &self.state.config
    }

    pub fn manifest_path(&self) -> &Path {
        self.writer.path()
    }

    /// Scan the content root and process everything found in one pass.
    ///
    /// Unlike debounced batches, failures here propagate to the caller.
    /// The manifest is always written when the root exists.
    pub async fn init(&mut self) -> Result<InitOutcome, WatchError> {
        let root = self.layout.root().to_path_buf();
        if !root.is_dir() {
            tracing::warn!("[session] no content directory found at {}", root.display());
            return Ok(InitOutcome::NoContentDirectory);
        }

        let events = scan(&root)?;
        let has_config = events.iter().any(|e| e.path == self.layout.config_path());
        if !has_config {
            self.state.config.set(ConfigStatus::DoesNotExist);
        }

        crate::log_event!("session", "scanning", "{} paths", events.len());
        let report = self.process(events, true).await?;
        crate::log_event!(
            "session",
            "ready",
            "{} collections, {} entries",
            self.state.collections.len(),
            self.state.collections.entry_count()
        );
        Ok(InitOutcome::Ready(report))
    }

    /// Process one debounced batch.
    ///
    /// Each event's outcome is independent; only the regeneration decision
    /// is combined. At most one manifest write happens per batch.
    pub async fn run_batch(
        &mut self,
        events: Vec<ContentEvent>,
    ) -> Result<BatchReport, WatchError> {
        self.process(events, false).await
    }

    /// Classify an event and route it to the first matching handler.
    pub async fn handle_event(&mut self, event: &ContentEvent) -> EventOutcome {
        let kind = classify(event, &self.layout);
        match &kind {
            FileKind::Ignored(reason) => {
                crate::debug_event!("session", "ignored", "{event} ({reason:?})");
                return EventOutcome::unchanged();
            }
            FileKind::Unsupported => {
                return EventOutcome::failed(ContentError::UnsupportedFile {
                    path: event.path.clone(),
                });
            }
            _ => {}
        }

        for handler in &self.handlers {
            if handler.matches(&kind) {
                crate::debug_event!(handler.name(), event.kind, "{}", event.path.display());
                return handler.handle(event, &kind, &mut self.state).await;
            }
        }

        crate::debug_event!("session", "unmatched", "{} {event}", kind.label());
        EventOutcome::unchanged()
    }

    async fn process(
        &mut self,
        events: Vec<ContentEvent>,
        force_write: bool,
    ) -> Result<BatchReport, WatchError> {
        let mut report = BatchReport {
            events: events.len(),
            ..BatchReport::default()
        };
        let mut unsupported = Vec::new();

        for event in &events {
            let outcome = self.handle_event(event).await;
            report.regenerated |= outcome.regenerate;

            match outcome.error {
                Some(ContentError::UnsupportedFile { path }) => unsupported.push(path),
                Some(e) if e.is_recoverable() => report.warnings.push(e.to_string()),
                Some(e) => {
                    tracing::error!("[session] {e}");
                    report.errors.push(e.to_string());
                }
                None => {}
            }
        }

        if !unsupported.is_empty() {
            report.warnings.push(unsupported_warning(&unsupported));
        }
        report.warnings.extend(self.missing_collection_warnings());

        for warning in &report.warnings {
            tracing::warn!("[session] {warning}");
        }

        self.dirty |= report.regenerated;
        if self.dirty || force_write {
            let path = self
                .writer
                .write(&self.state.collections, &self.state.config.get())?;
            crate::log_event!("manifest", "generated", "{}", path.display());
            report.manifest = Some(path.to_path_buf());
            self.dirty = false;
        }

        Ok(report)
    }

    /// Configured collections with no matching directory.
    fn missing_collection_warnings(&self) -> Vec<String> {
        let ConfigStatus::Loaded(definition) = self.state.config.get() else {
            return Vec::new();
        };

        definition
            .names()
            .filter(|name| !self.state.collections.contains(name))
            .map(|name| {
                format!(
                    "{name:?} is not a collection. Check your content config for typos, \
                     or create a {name:?} directory in {}.",
                    self.layout.root().display()
                )
            })
            .collect()
    }
}

fn unsupported_warning(paths: &[PathBuf]) -> String {
    let mut message =
        String::from("Unsupported file types found. Prefix with an underscore (`_`) to ignore:");
    for path in paths {
        message.push_str("\n- ");
        message.push_str(&path.display().to_string());
    }
    message
}

fn is_excluded(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('_') || name.starts_with('.'))
}

/// Walk the content root, producing `addDir` for collection directories
/// ahead of every file `add`.
fn scan(root: &Path) -> Result<Vec<ContentEvent>, WatchError> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && is_excluded(e)));

    for entry in walker {
        let entry = entry.map_err(|e| WatchError::ScanFailed {
            path: e.path().unwrap_or(root).to_path_buf(),
            reason: e.to_string(),
        })?;

        if entry.file_type().is_dir() {
            if entry.depth() == 1 {
                dirs.push(ContentEvent::add_dir(entry.into_path()));
            }
        } else {
            files.push(ContentEvent::add(entry.into_path()));
        }
    }

    dirs.extend(files);
    Ok(dirs)
}

/// Builder for constructing a [`ContentSession`].
pub struct ContentSessionBuilder {
    layout: ContentLayout,
    manifest_path: Option<PathBuf>,
    config_import: Option<String>,
    loader: Arc<dyn ContentConfigLoader>,
    frontmatter: Arc<dyn FrontmatterReader>,
    extra_handlers: Vec<Box<dyn EventHandler>>,
    state: TrackerState,
}

impl ContentSessionBuilder {
    pub fn new(layout: ContentLayout) -> Self {
        Self {
            layout,
            manifest_path: None,
            config_import: None,
            loader: Arc::new(TomlConfigLoader),
            frontmatter: Arc::new(YamlFrontmatter),
            extra_handlers: Vec::new(),
            state: TrackerState::default(),
        }
    }

    /// Where the manifest is written. Required.
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Module specifier for the config type slot.
    pub fn config_import(mut self, import: Option<String>) -> Self {
        self.config_import = import;
        self
    }

    pub fn config_loader(mut self, loader: Arc<dyn ContentConfigLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn frontmatter(mut self, reader: Arc<dyn FrontmatterReader>) -> Self {
        self.frontmatter = reader;
        self
    }

    /// Share an existing observable, e.g. with a renderer that reads it.
    pub fn config_observer(mut self, observer: ConfigObserver) -> Self {
        self.state.config = observer;
        self
    }

    /// Add a handler consulted before the built-in ones.
    pub fn handler(mut self, handler: impl EventHandler + 'static) -> Self {
        self.extra_handlers.push(Box::new(handler));
        self
    }

    pub fn build(self) -> Result<ContentSession, WatchError> {
        let manifest_path = self.manifest_path.ok_or_else(|| WatchError::InitFailed {
            reason: "Manifest path is required".to_string(),
        })?;

        let writer = ManifestWriter::new(&self.layout, manifest_path, self.config_import);

        let mut handlers = self.extra_handlers;
        handlers.push(Box::new(CollectionDirHandler));
        handlers.push(Box::new(ConfigFileHandler::new(
            self.layout.config_path().to_path_buf(),
            self.loader,
        )));
        handlers.push(Box::new(EntryFileHandler::new(self.frontmatter)));

        Ok(ContentSession {
            layout: self.layout,
            state: self.state,
            handlers,
            writer,
            dirty: false,
        })
    }
}
