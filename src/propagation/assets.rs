//! Per-page asset records and their aggregation per output chunk.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::bundle::OutputChunk;
use super::error::{PropagationError, PropagationResult};
use super::graph::{ImporterWalker, TopLevelPage};

/// Styles and scripts one module contributes to a page.
///
/// Sets keep first-seen order so substituted output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAssets {
    /// Stylesheet URLs, relative to the site root.
    #[serde(default)]
    pub styles: IndexSet<String>,
    /// Module ids of hoisted scripts.
    #[serde(default)]
    pub scripts: IndexSet<String>,
}

impl ModuleAssets {
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.scripts.is_empty()
    }

    pub fn merge(&mut self, other: &ModuleAssets) {
        self.styles.extend(other.styles.iter().cloned());
        self.scripts.extend(other.scripts.iter().cloned());
    }
}

/// `page id -> module id -> assets`, recorded while pages were rendered.
///
/// ```json
/// { "src/pages/blog.page": { "src/content/blog/post.md": { "styles": ["/a.css"] } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageAssetMap {
    pages: IndexMap<String, IndexMap<String, ModuleAssets>>,
}

impl PageAssetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> PropagationResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PropagationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| PropagationError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Record assets, merging with anything already present.
    pub fn insert(&mut self, page: &str, module: &str, assets: ModuleAssets) {
        self.pages
            .entry(page.to_string())
            .or_default()
            .entry(module.to_string())
            .or_default()
            .merge(&assets);
    }

    pub fn get(&self, page: &str, module: &str) -> Option<&ModuleAssets> {
        self.pages.get(page)?.get(module)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Collects the assets a chunk's modules bring to their owning pages.
pub struct AssetAggregator<'a, P> {
    walker: ImporterWalker<'a, P>,
    assets: &'a PageAssetMap,
}

impl<'a, P: TopLevelPage> AssetAggregator<'a, P> {
    pub fn new(walker: ImporterWalker<'a, P>, assets: &'a PageAssetMap) -> Self {
        Self { walker, assets }
    }

    /// Union of every `(page, module)` record reachable from the chunk.
    /// Duplicates across modules and pages collapse.
    pub fn collect(&mut self, chunk: &OutputChunk) -> ModuleAssets {
        let mut collected = ModuleAssets::default();

        for module in &chunk.module_ids {
            for page in self.walker.pages_for_name(module) {
                if let Some(found) = self.assets.get(page, module) {
                    collected.merge(found);
                }
            }
        }

        collected
    }
}
