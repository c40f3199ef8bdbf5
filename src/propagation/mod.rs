//! Build-time asset propagation.
//!
//! Content entries can pull in stylesheets and scripts, but they are
//! rendered by whichever page imports them. After bundling, every server
//! chunk that carries asset placeholders is traced back through the module
//! graph to its top-level pages, and the assets recorded for those pages
//! are substituted in.
//!
//! ```text
//! BundleOutput ──> ModuleGraph ──> ImporterWalker (memoized)
//!                                        |
//!                    PageAssetMap ──> AssetAggregator
//!                                        |
//!                                  ChunkMutation (links, scripts)
//! ```

pub mod assets;
pub mod bundle;
pub mod error;
pub mod graph;
pub mod module;
pub mod placeholder;
mod substitute;

pub use assets::{AssetAggregator, ModuleAssets, PageAssetMap};
pub use bundle::{BundleOutput, ChunkKind, ChunkMutation, ModuleInfo, OutputChunk};
pub use error::{PropagationError, PropagationResult};
pub use graph::{ImportedByPageEntry, ImporterWalker, ModuleGraph, ModuleId, TopLevelPage};
pub use module::{WrapperMode, has_propagation_flag, render_wrapper, transform_dev};
pub use placeholder::{
    AssetUrls, Placeholder, ScriptDescriptor, ensure_no_leftovers, find_leftovers,
};
pub use substitute::propagate_assets;
