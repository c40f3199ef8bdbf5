//! Build-time substitution of asset placeholders in server chunks.

use indexmap::IndexSet;

use super::assets::{AssetAggregator, PageAssetMap};
use super::bundle::{BundleOutput, ChunkKind, ChunkMutation};
use super::error::PropagationResult;
use super::graph::{ImporterWalker, ModuleGraph, TopLevelPage};
use super::placeholder::{AssetUrls, Placeholder, ScriptDescriptor};

/// Compute replacement code for every server chunk that carries a link or
/// script placeholder.
///
/// A chunk whose collected styles (or scripts) are empty keeps the
/// corresponding token; [`super::placeholder::ensure_no_leftovers`] turns
/// that into an error downstream.
pub fn propagate_assets<P: TopLevelPage>(
    bundle: &BundleOutput,
    pages: &PageAssetMap,
    top_level: P,
    urls: &AssetUrls,
) -> PropagationResult<Vec<ChunkMutation>> {
    let graph = ModuleGraph::from_bundle(bundle);
    let mut aggregator = AssetAggregator::new(ImporterWalker::new(&graph, top_level), pages);
    let mut mutations = Vec::new();

    for chunk in &bundle.server {
        if chunk.kind != ChunkKind::Chunk {
            continue;
        }
        if !Placeholder::BUILD.iter().any(|p| p.is_in(&chunk.code)) {
            continue;
        }

        let collected = aggregator.collect(chunk);
        let mut code = chunk.code.clone();

        if !collected.styles.is_empty() {
            let links: Vec<String> = collected.styles.iter().map(|s| urls.prepend(s)).collect();
            code = Placeholder::Links.replace(&code, &serde_json::to_string(&links)?);
        }

        if !collected.scripts.is_empty() {
            let scripts: Vec<ScriptDescriptor> = client_file_names(bundle, &collected.scripts)
                .into_iter()
                .map(|file| ScriptDescriptor::module(urls.prepend(file)))
                .collect();
            code = Placeholder::Scripts.replace(&code, &serde_json::to_string(&scripts)?);
        }

        if code != chunk.code {
            crate::debug_event!(
                "propagate",
                "rewrote",
                "{} ({} styles, {} scripts)",
                chunk.file_name,
                collected.styles.len(),
                collected.scripts.len()
            );
            mutations.push(ChunkMutation {
                file_name: chunk.file_name.clone(),
                code,
            });
        } else {
            tracing::warn!(
                "[propagate] no assets found for placeholders in {}",
                chunk.file_name
            );
        }
    }

    Ok(mutations)
}

/// Emitted client file names for the given script module ids.
fn client_file_names<'b>(
    bundle: &'b BundleOutput,
    scripts: &IndexSet<String>,
) -> IndexSet<&'b str> {
    let mut files = IndexSet::new();
    for id in scripts {
        for chunk in &bundle.client {
            if chunk.kind == ChunkKind::Chunk && chunk.contains_module(id) {
                files.insert(chunk.file_name.as_str());
            }
        }
    }
    files
}
