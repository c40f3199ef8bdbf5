//! In-memory collection map: collection name -> entry id -> metadata.
//!
//! Both levels are `BTreeMap`s so iteration is lexicographic, which the
//! manifest writer relies on for byte-identical output.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ContentError, ContentResult};

/// Kind of an entry, and of the collection that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Content,
    Data,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Content => "content",
            EntryKind::Data => "data",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata tracked per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryMeta {
    Content { slug: String },
    Data,
}

impl EntryMeta {
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryMeta::Content { .. } => EntryKind::Content,
            EntryMeta::Data => EntryKind::Data,
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            EntryMeta::Content { slug } => Some(slug),
            EntryMeta::Data => None,
        }
    }
}

/// A named group of homogeneous entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Set by the first entry added; cleared when the last entry leaves.
    kind: Option<EntryKind>,
    entries: BTreeMap<String, EntryMeta>,
}

impl Collection {
    pub fn kind(&self) -> Option<EntryKind> {
        self.kind
    }

    pub fn entries(&self) -> &BTreeMap<String, EntryMeta> {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&EntryMeta> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of inserting an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Entry did not exist before.
    Inserted,
    /// Entry existed with different metadata (e.g. a new slug).
    Updated { previous: EntryMeta },
    /// Entry existed with identical metadata.
    Unchanged,
}

impl InsertOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, InsertOutcome::Unchanged)
    }
}

/// Process-wide map of collections, owned by one tracking session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionMap {
    collections: BTreeMap<String, Collection>,
}

impl CollectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new, empty collection. Returns false if it already existed.
    pub fn add_collection(&mut self, name: &str) -> bool {
        if self.collections.contains_key(name) {
            return false;
        }
        self.collections.insert(name.to_string(), Collection::default());
        true
    }

    /// Stop tracking a collection and all its entries.
    pub fn remove_collection(&mut self, name: &str) -> Option<Collection> {
        self.collections.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    pub fn entry(&self, collection: &str, id: &str) -> Option<&EntryMeta> {
        self.collections.get(collection)?.get(id)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Collection)> {
        self.collections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Total number of entries across all collections.
    pub fn entry_count(&self) -> usize {
        self.collections.values().map(Collection::len).sum()
    }

    /// Insert or update an entry.
    ///
    /// Fails when the collection is not tracked or when the entry kind does
    /// not match the kind already established for the collection.
    pub fn insert_entry(
        &mut self,
        collection: &str,
        id: &str,
        meta: EntryMeta,
        path: &Path,
    ) -> ContentResult<InsertOutcome> {
        let Some(target) = self.collections.get_mut(collection) else {
            return Err(ContentError::UntrackedCollection {
                collection: collection.to_string(),
                path: path.to_path_buf(),
            });
        };

        let found = meta.kind();
        match target.kind {
            Some(expected) if expected != found => {
                return Err(ContentError::MixedCollection {
                    collection: collection.to_string(),
                    path: path.to_path_buf(),
                    expected,
                    found,
                });
            }
            Some(_) => {}
            None => target.kind = Some(found),
        }

        let outcome = match target.entries.insert(id.to_string(), meta.clone()) {
            None => InsertOutcome::Inserted,
            Some(previous) if previous == meta => InsertOutcome::Unchanged,
            Some(previous) => InsertOutcome::Updated { previous },
        };
        Ok(outcome)
    }

    /// Remove an entry. The collection reverts to an undetermined kind once
    /// its last entry is gone.
    pub fn remove_entry(&mut self, collection: &str, id: &str) -> Option<EntryMeta> {
        let target = self.collections.get_mut(collection)?;
        let removed = target.entries.remove(id);
        if target.entries.is_empty() {
            target.kind = None;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(slug: &str) -> EntryMeta {
        EntryMeta::Content {
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_add_and_remove_collection() {
        let mut map = CollectionMap::new();
        assert!(map.add_collection("blog"));
        assert!(!map.add_collection("blog"));
        assert!(map.contains("blog"));
        assert_eq!(map.get("blog").unwrap().kind(), None);

        assert!(map.remove_collection("blog").is_some());
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert_into_untracked_collection_fails() {
        let mut map = CollectionMap::new();
        let err = map
            .insert_entry("blog", "a.md", content("a"), Path::new("/c/blog/a.md"))
            .unwrap_err();
        assert!(matches!(err, ContentError::UntrackedCollection { .. }));
        assert!(map.is_empty());
    }

    #[test]
    fn test_first_entry_sets_kind() {
        let mut map = CollectionMap::new();
        map.add_collection("authors");
        let outcome = map
            .insert_entry("authors", "ben", EntryMeta::Data, Path::new("/c/authors/ben.json"))
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);
        assert_eq!(map.get("authors").unwrap().kind(), Some(EntryKind::Data));
    }

    #[test]
    fn test_mixed_kinds_rejected() {
        let mut map = CollectionMap::new();
        map.add_collection("blog");
        map.insert_entry("blog", "a.md", content("a"), Path::new("/c/blog/a.md"))
            .unwrap();

        let err = map
            .insert_entry("blog", "meta", EntryMeta::Data, Path::new("/c/blog/meta.json"))
            .unwrap_err();
        assert!(matches!(
            err,
            ContentError::MixedCollection {
                expected: EntryKind::Content,
                found: EntryKind::Data,
                ..
            }
        ));
        assert_eq!(map.get("blog").unwrap().len(), 1);
    }

    #[test]
    fn test_insert_outcomes() {
        let mut map = CollectionMap::new();
        map.add_collection("blog");
        let path = Path::new("/c/blog/a.md");

        assert_eq!(
            map.insert_entry("blog", "a.md", content("a"), path).unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            map.insert_entry("blog", "a.md", content("a"), path).unwrap(),
            InsertOutcome::Unchanged
        );
        assert_eq!(
            map.insert_entry("blog", "a.md", content("b"), path).unwrap(),
            InsertOutcome::Updated {
                previous: content("a")
            }
        );
        assert_eq!(map.entry("blog", "a.md").unwrap().slug(), Some("b"));
    }

    #[test]
    fn test_add_then_remove_restores_state() {
        let mut map = CollectionMap::new();
        map.add_collection("blog");
        map.add_collection("authors");
        map.insert_entry("authors", "ben", EntryMeta::Data, Path::new("/c/authors/ben.json"))
            .unwrap();
        let before = map.clone();

        map.insert_entry("blog", "new.md", content("new"), Path::new("/c/blog/new.md"))
            .unwrap();
        assert_ne!(map, before);

        map.remove_entry("blog", "new.md");
        assert_eq!(map, before);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mut map = CollectionMap::new();
        for name in ["zeta", "alpha", "mid"] {
            map.add_collection(name);
        }
        let names: Vec<_> = map.names().collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
