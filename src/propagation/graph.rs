//! Module dependency graph and the backward walk to top-level pages.
//!
//! Module ids are interned into a dense arena so the walk can mark visited
//! nodes in a `Vec<bool>` instead of hashing strings. Edges are stored
//! reversed (imported -> importers) since that is the only direction the
//! walk needs.

use std::collections::HashMap;

use super::bundle::BundleOutput;

/// Dense handle to an interned module id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u32);

impl ModuleId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Read-only snapshot of the importer relation.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    names: Vec<String>,
    lookup: HashMap<String, ModuleId>,
    importers: Vec<Vec<ModuleId>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from bundler module metadata. Static and dynamic importers
    /// both count, static ones listed first; modules that only appear in
    /// chunks are interned too.
    pub fn from_bundle(bundle: &BundleOutput) -> Self {
        let mut graph = Self::new();
        for info in &bundle.modules {
            graph.intern(&info.id);
            for importer in &info.importers {
                graph.add_import(importer, &info.id);
            }
        }
        // After every static edge, so a module's first importer is static
        // whenever it has one
        for info in &bundle.modules {
            for importer in &info.dynamic_importers {
                graph.add_import(importer, &info.id);
            }
        }
        for chunk in bundle.server.iter().chain(&bundle.client) {
            for id in &chunk.module_ids {
                graph.intern(id);
            }
        }
        graph
    }

    pub fn intern(&mut self, name: &str) -> ModuleId {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }
        let id = ModuleId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.importers.push(Vec::new());
        self.lookup.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<ModuleId> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, id: ModuleId) -> &str {
        &self.names[id.index()]
    }

    /// Record that `importer` imports `imported`.
    pub fn add_import(&mut self, importer: &str, imported: &str) {
        let from = self.intern(importer);
        let to = self.intern(imported);
        let edges = &mut self.importers[to.index()];
        if !edges.contains(&from) {
            edges.push(from);
        }
    }

    pub fn importers(&self, id: ModuleId) -> &[ModuleId] {
        &self.importers[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Decides which modules are routable pages.
pub trait TopLevelPage {
    fn is_top_level(&self, graph: &ModuleGraph, module: ModuleId) -> bool;
}

impl<F> TopLevelPage for F
where
    F: Fn(&str) -> bool,
{
    fn is_top_level(&self, graph: &ModuleGraph, module: ModuleId) -> bool {
        self(graph.name(module))
    }
}

/// A module is a page when its first importer is a synthetic page entry,
/// recognised by an id prefix.
#[derive(Debug, Clone)]
pub struct ImportedByPageEntry {
    prefix: String,
}

impl ImportedByPageEntry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl TopLevelPage for ImportedByPageEntry {
    fn is_top_level(&self, graph: &ModuleGraph, module: ModuleId) -> bool {
        graph
            .importers(module)
            .first()
            .is_some_and(|&importer| graph.name(importer).starts_with(&self.prefix))
    }
}

/// Walks importer edges from a module up to every page depending on it.
///
/// Results are memoized per start module for the lifetime of the walker,
/// which is one propagation pass over an immutable graph.
pub struct ImporterWalker<'g, P> {
    graph: &'g ModuleGraph,
    pages: P,
    memo: Vec<Option<Vec<ModuleId>>>,
}

impl<'g, P: TopLevelPage> ImporterWalker<'g, P> {
    pub fn new(graph: &'g ModuleGraph, pages: P) -> Self {
        Self {
            graph,
            pages,
            memo: vec![None; graph.len()],
        }
    }

    pub fn graph(&self) -> &'g ModuleGraph {
        self.graph
    }

    /// Top-level pages that transitively import `start`, including `start`
    /// itself when it is a page. Each page appears once, in discovery order.
    pub fn pages_for(&mut self, start: ModuleId) -> &[ModuleId] {
        let index = start.index();
        if self.memo[index].is_none() {
            let found = self.walk(start);
            self.memo[index] = Some(found);
        }
        self.memo[index].as_deref().unwrap_or(&[])
    }

    /// Same as [`pages_for`](Self::pages_for) keyed by module name. Unknown
    /// modules have no pages.
    pub fn pages_for_name(&mut self, name: &str) -> Vec<&'g str> {
        let Some(start) = self.graph.get(name) else {
            return Vec::new();
        };
        let graph = self.graph;
        self.pages_for(start)
            .iter()
            .map(|&page| graph.name(page))
            .collect()
    }

    fn walk(&self, start: ModuleId) -> Vec<ModuleId> {
        let mut visited = vec![false; self.graph.len()];
        let mut stack = vec![start];
        let mut found = Vec::new();
        visited[start.index()] = true;

        while let Some(module) = stack.pop() {
            if self.pages.is_top_level(self.graph, module) {
                found.push(module);
            }
            for &importer in self.graph.importers(module) {
                if !visited[importer.index()] {
                    visited[importer.index()] = true;
                    stack.push(importer);
                }
            }
        }

        found
    }
}
