//! Bridge from `notify` to the tracker.
//!
//! `notify` reports platform events (create, modify, rename halves,
//! remove) that do not always say whether the path was a directory. The
//! translator keeps the set of known directories so removals can be told
//! apart, and expands a newly appeared directory into events for its
//! contents, since a directory moved into the tree arrives as one event.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use walkdir::WalkDir;

use crate::content::ContentEvent;

use super::error::WatchError;
use super::tracker::TrackerHandle;

/// Converts raw `notify` events into [`ContentEvent`]s.
#[derive(Debug)]
pub struct EventTranslator {
    known_dirs: HashSet<PathBuf>,
}

impl EventTranslator {
    /// Seed the directory set from what currently exists under `root`.
    pub fn new(root: &Path) -> Self {
        let known_dirs = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_dir())
            .map(walkdir::DirEntry::into_path)
            .collect();
        Self { known_dirs }
    }

    pub fn is_known_dir(&self, path: &Path) -> bool {
        self.known_dirs.contains(path)
    }

    pub fn translate(&mut self, event: Event) -> Vec<ContentEvent> {
        let mut out = Vec::new();

        match event.kind {
            EventKind::Create(CreateKind::Folder) => {
                for path in event.paths {
                    self.appeared(path, true, &mut out);
                }
            }
            EventKind::Create(CreateKind::File) => {
                for path in event.paths {
                    self.appeared(path, false, &mut out);
                }
            }
            EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                for path in event.paths {
                    let is_dir = path.is_dir();
                    self.appeared(path, is_dir, &mut out);
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                for path in event.paths {
                    self.disappeared(path, None, &mut out);
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                let mut paths = event.paths.into_iter();
                if let Some(from) = paths.next() {
                    self.disappeared(from, None, &mut out);
                }
                if let Some(to) = paths.next() {
                    let is_dir = to.is_dir();
                    self.appeared(to, is_dir, &mut out);
                }
            }
            // Backends that cannot tell the halves apart
            EventKind::Modify(ModifyKind::Name(_)) => {
                for path in event.paths {
                    if path.exists() {
                        let is_dir = path.is_dir();
                        self.appeared(path, is_dir, &mut out);
                    } else {
                        self.disappeared(path, None, &mut out);
                    }
                }
            }
            EventKind::Modify(_) => {
                for path in event.paths {
                    if path.is_file() {
                        out.push(ContentEvent::change(path));
                    }
                }
            }
            EventKind::Remove(RemoveKind::Folder) => {
                for path in event.paths {
                    self.disappeared(path, Some(true), &mut out);
                }
            }
            EventKind::Remove(RemoveKind::File) => {
                for path in event.paths {
                    self.disappeared(path, Some(false), &mut out);
                }
            }
            EventKind::Remove(_) => {
                for path in event.paths {
                    self.disappeared(path, None, &mut out);
                }
            }
            EventKind::Access(_) | EventKind::Any | EventKind::Other => {}
        }

        out
    }

    fn appeared(&mut self, path: PathBuf, is_dir: bool, out: &mut Vec<ContentEvent>) {
        if !is_dir {
            out.push(ContentEvent::add(path));
            return;
        }

        if !self.known_dirs.insert(path.clone()) {
            return;
        }
        out.push(ContentEvent::add_dir(&path));

        // Contents of a directory moved in as a whole
        for entry in WalkDir::new(&path)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if entry.file_type().is_dir() {
                if self.known_dirs.insert(entry.path().to_path_buf()) {
                    out.push(ContentEvent::add_dir(entry.into_path()));
                }
            } else {
                out.push(ContentEvent::add(entry.into_path()));
            }
        }
    }

    fn disappeared(&mut self, path: PathBuf, is_dir: Option<bool>, out: &mut Vec<ContentEvent>) {
        let was_dir = is_dir.unwrap_or_else(|| self.known_dirs.contains(&path));
        if was_dir {
            self.known_dirs.retain(|dir| !dir.starts_with(&path));
            out.push(ContentEvent::unlink_dir(path));
        } else {
            out.push(ContentEvent::unlink(path));
        }
    }
}

/// Live filesystem watch feeding a tracker.
///
/// Dropping it stops the watch; the forwarding task ends once the
/// `notify` channel closes.
pub struct ContentWatcher {
    _watcher: RecommendedWatcher,
    forwarder: JoinHandle<()>,
}

impl ContentWatcher {
    pub fn start(root: &Path, tracker: TrackerHandle) -> Result<Self, WatchError> {
        let (tx, mut rx) = mpsc::channel(256);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        })?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::PathWatchFailed {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut translator = EventTranslator::new(root);
        let forwarder = tokio::spawn(async move {
            while let Some(res) = rx.recv().await {
                match res {
                    Ok(event) => {
                        for event in translator.translate(event) {
                            if tracker.enqueue(event).is_err() {
                                crate::debug_event!("watcher", "tracker gone");
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!("[watcher] file watch error: {e}");
                    }
                }
            }
        });

        crate::log_event!("watcher", "watching", "{}", root.display());
        Ok(Self {
            _watcher: watcher,
            forwarder,
        })
    }

    /// Stop watching and wait for the forwarder to drain.
    pub async fn stop(self) {
        let Self {
            _watcher: watcher,
            forwarder,
        } = self;
        drop(watcher);
        let _ = forwarder.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ChangeKind;
    use tempfile::TempDir;

    fn kinds(events: &[ContentEvent]) -> Vec<ChangeKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_created_directory_is_expanded() {
        let dir = TempDir::new().unwrap();
        let mut translator = EventTranslator::new(dir.path());

        let blog = dir.path().join("blog");
        std::fs::create_dir_all(blog.join("2024")).unwrap();
        std::fs::write(blog.join("a.md"), "").unwrap();
        std::fs::write(blog.join("2024/b.md"), "").unwrap();

        let events = translator
            .translate(Event::new(EventKind::Create(CreateKind::Folder)).add_path(blog.clone()));

        assert_eq!(events[0], ContentEvent::add_dir(&blog));
        assert_eq!(
            kinds(&events),
            vec![
                ChangeKind::AddDir,
                ChangeKind::AddDir,
                ChangeKind::Add,
                ChangeKind::Add
            ]
        );
        assert!(translator.is_known_dir(&blog.join("2024")));
    }

    #[test]
    fn test_ambiguous_removal_uses_known_dirs() {
        let dir = TempDir::new().unwrap();
        let blog = dir.path().join("blog");
        std::fs::create_dir_all(&blog).unwrap();
        let mut translator = EventTranslator::new(dir.path());

        let file = blog.join("post.md");
        let events = translator.translate(
            Event::new(EventKind::Remove(RemoveKind::Any))
                .add_path(file.clone())
                .add_path(blog.clone()),
        );

        assert_eq!(
            events,
            vec![ContentEvent::unlink(&file), ContentEvent::unlink_dir(&blog)]
        );
        assert!(!translator.is_known_dir(&blog));
    }

    #[test]
    fn test_rename_both_splits_into_unlink_and_add() {
        let dir = TempDir::new().unwrap();
        let mut translator = EventTranslator::new(dir.path());
        let from = dir.path().join("old.md");
        let to = dir.path().join("new.md");
        std::fs::write(&to, "").unwrap();

        let events = translator.translate(
            Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
                .add_path(from.clone())
                .add_path(to.clone()),
        );

        assert_eq!(
            events,
            vec![ContentEvent::unlink(&from), ContentEvent::add(&to)]
        );
    }

    #[test]
    fn test_modify_of_directory_is_dropped() {
        let dir = TempDir::new().unwrap();
        let mut translator = EventTranslator::new(dir.path());
        let file = dir.path().join("a.json");
        std::fs::write(&file, "{}").unwrap();

        let events = translator.translate(
            Event::new(EventKind::Modify(ModifyKind::Any))
                .add_path(dir.path().to_path_buf())
                .add_path(file.clone()),
        );
        assert_eq!(events, vec![ContentEvent::change(&file)]);
    }
}
