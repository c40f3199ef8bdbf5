//! Handler for content and data entry files.
//!
//! Data entries carry no derived metadata, so their `change` events never
//! require regeneration. Content entries recompute their slug on `change`
//! and only regenerate when it actually moved.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::content::slug::{content_entry_id, data_entry_id, resolve_slug};
use crate::content::{
    ChangeKind, ContentError, ContentEvent, EntryMeta, EntryPath, FileKind, FrontmatterReader,
    InsertOutcome,
};
use crate::watcher::{EventHandler, EventOutcome, TrackerState};

pub struct EntryFileHandler {
    frontmatter: Arc<dyn FrontmatterReader>,
}

impl EntryFileHandler {
    pub fn new(frontmatter: Arc<dyn FrontmatterReader>) -> Self {
        Self { frontmatter }
    }

    async fn read_slug(&self, path: &Path, id: &str) -> Result<String, ContentError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ContentError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let frontmatter = self.frontmatter.read(&raw, path)?;
        Ok(resolve_slug(id, frontmatter.slug()))
    }

    fn insert(
        &self,
        state: &mut TrackerState,
        collection: &str,
        id: &str,
        meta: EntryMeta,
        path: &Path,
    ) -> EventOutcome {
        match state.collections.insert_entry(collection, id, meta, path) {
            Ok(InsertOutcome::Unchanged) => EventOutcome::unchanged(),
            Ok(InsertOutcome::Inserted) => {
                crate::debug_event!(self.name(), "added", "{collection}/{id}");
                EventOutcome::regenerate()
            }
            Ok(InsertOutcome::Updated { previous }) => {
                crate::debug_event!(
                    self.name(),
                    "updated",
                    "{collection}/{id} (was {:?})",
                    previous.slug()
                );
                EventOutcome::regenerate()
            }
            Err(e) => EventOutcome::failed(e),
        }
    }

    fn remove(&self, state: &mut TrackerState, collection: &str, id: &str) -> EventOutcome {
        let removed = state.collections.remove_entry(collection, id).is_some();
        if removed {
            crate::debug_event!(self.name(), "removed", "{collection}/{id}");
        }
        EventOutcome::changed(removed)
    }

    async fn handle_content(
        &self,
        event: &ContentEvent,
        collection: &str,
        entry: &EntryPath,
        state: &mut TrackerState,
    ) -> EventOutcome {
        let id = content_entry_id(&entry.relative);
        match event.kind {
            ChangeKind::Add | ChangeKind::Change => {
                let slug = match self.read_slug(&event.path, &id).await {
                    Ok(slug) => slug,
                    Err(e) => return EventOutcome::failed(e),
                };
                self.insert(state, collection, &id, EntryMeta::Content { slug }, &event.path)
            }
            ChangeKind::Unlink => self.remove(state, collection, &id),
            ChangeKind::AddDir | ChangeKind::UnlinkDir => EventOutcome::unchanged(),
        }
    }

    fn handle_data(
        &self,
        event: &ContentEvent,
        collection: &str,
        entry: &EntryPath,
        state: &mut TrackerState,
    ) -> EventOutcome {
        let id = data_entry_id(&entry.relative);
        match event.kind {
            ChangeKind::Add => self.insert(state, collection, &id, EntryMeta::Data, &event.path),
            ChangeKind::Unlink => self.remove(state, collection, &id),
            ChangeKind::Change | ChangeKind::AddDir | ChangeKind::UnlinkDir => {
                EventOutcome::unchanged()
            }
        }
    }
}

#[async_trait]
impl EventHandler for EntryFileHandler {
    fn name(&self) -> &str {
        "entry"
    }

    fn matches(&self, kind: &FileKind) -> bool {
        matches!(kind, FileKind::Content(_) | FileKind::Data(_))
    }

    async fn handle(
        &self,
        event: &ContentEvent,
        kind: &FileKind,
        state: &mut TrackerState,
    ) -> EventOutcome {
        let entry = match kind {
            FileKind::Content(entry) | FileKind::Data(entry) => entry,
            _ => return EventOutcome::unchanged(),
        };

        let Some(collection) = entry.collection.as_deref() else {
            return EventOutcome::failed(ContentError::MissingCollection {
                path: event.path.clone(),
            });
        };

        if event.kind == ChangeKind::Unlink && !state.collections.contains(collection) {
            return EventOutcome::unchanged();
        }

        match kind {
            FileKind::Content(_) => self.handle_content(event, collection, entry, state).await,
            _ => self.handle_data(event, collection, entry, state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentLayout, YamlFrontmatter, classify};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        layout: ContentLayout,
        handler: EntryFileHandler,
        state: TrackerState,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let layout = ContentLayout::new(dir.path(), "config.toml", ["md"], ["json"]);
            let mut state = TrackerState::default();
            for name in ["blog", "settings"] {
                std::fs::create_dir_all(dir.path().join(name)).unwrap();
                state.collections.add_collection(name);
            }
            Self {
                _dir: dir,
                layout,
                handler: EntryFileHandler::new(Arc::new(YamlFrontmatter)),
                state,
            }
        }

        fn write(&self, rel: &str, text: &str) -> std::path::PathBuf {
            let path = self.layout.root().join(rel);
            std::fs::write(&path, text).unwrap();
            path
        }

        async fn apply(&mut self, event: ContentEvent) -> EventOutcome {
            let kind = classify(&event, &self.layout);
            self.handler.handle(&event, &kind, &mut self.state).await
        }
    }

    #[tokio::test]
    async fn test_frontmatter_slug_override() {
        let mut fx = Fixture::new();
        let path = fx.write("blog/post1.md", "---\nslug: custom\n---\nHello");

        let outcome = fx.apply(ContentEvent::add(&path)).await;
        assert!(outcome.regenerate);
        assert_eq!(
            fx.state.collections.entry("blog", "post1.md"),
            Some(&EntryMeta::Content {
                slug: "custom".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_content_change_regenerates_only_on_slug_change() {
        let mut fx = Fixture::new();
        let path = fx.write("blog/post.md", "---\ntitle: A\n---\nfirst");
        fx.apply(ContentEvent::add(&path)).await;

        fx.write("blog/post.md", "---\ntitle: B\n---\nbody edit only");
        let outcome = fx.apply(ContentEvent::change(&path)).await;
        assert!(!outcome.regenerate);
        assert!(outcome.error.is_none());

        fx.write("blog/post.md", "---\nslug: moved\n---\nbody");
        let outcome = fx.apply(ContentEvent::change(&path)).await;
        assert!(outcome.regenerate);
        assert_eq!(
            fx.state.collections.entry("blog", "post.md").unwrap().slug(),
            Some("moved")
        );
    }

    #[tokio::test]
    async fn test_data_change_never_regenerates() {
        let mut fx = Fixture::new();
        let path = fx.write("settings/site.json", "{\"a\": 1}");

        let outcome = fx.apply(ContentEvent::add(&path)).await;
        assert!(outcome.regenerate);
        assert_eq!(
            fx.state.collections.entry("settings", "site"),
            Some(&EntryMeta::Data)
        );

        fx.write("settings/site.json", "{\"a\": 2}");
        let outcome = fx.apply(ContentEvent::change(&path)).await;
        assert!(!outcome.regenerate);
    }

    #[tokio::test]
    async fn test_entry_without_collection_is_skipped() {
        let mut fx = Fixture::new();
        let path = fx.write("stray.md", "no collection");
        let before = fx.state.collections.clone();

        let outcome = fx.apply(ContentEvent::add(&path)).await;
        assert!(!outcome.regenerate);
        assert!(matches!(
            outcome.error,
            Some(ContentError::MissingCollection { .. })
        ));
        assert_eq!(fx.state.collections, before);
    }

    #[tokio::test]
    async fn test_add_then_unlink_round_trip() {
        let mut fx = Fixture::new();
        let before = fx.state.collections.clone();
        let path = fx.write("blog/temp.md", "---\nslug: t\n---\n");

        fx.apply(ContentEvent::add(&path)).await;
        std::fs::remove_file(&path).unwrap();
        let outcome = fx.apply(ContentEvent::unlink(&path)).await;

        assert!(outcome.regenerate);
        assert_eq!(fx.state.collections, before);
    }

    #[tokio::test]
    async fn test_unreadable_content_reports_io_error() {
        let mut fx = Fixture::new();
        let path = fx.layout.root().join("blog/missing.md");

        let outcome = fx.apply(ContentEvent::add(&path)).await;
        assert!(matches!(outcome.error, Some(ContentError::Io { .. })));
        assert!(fx.state.collections.entry("blog", "missing.md").is_none());
    }
}
