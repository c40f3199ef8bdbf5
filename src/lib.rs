//! Incremental content-collection tracking and build-time asset propagation.
//!
//! - [`content`]: classification, the collection map, slugs, the config
//!   observable and the generated manifest
//! - [`watcher`]: handlers, the batching session, the tracker actor and the
//!   `notify` bridge
//! - [`propagation`]: module graph walk, asset aggregation and placeholder
//!   substitution over bundle output

pub mod cli;
pub mod config;
pub mod content;
pub mod logging;
pub mod propagation;
pub mod watcher;

pub use config::Settings;
pub use content::{CollectionMap, ContentEvent, ContentLayout};
pub use propagation::{BundleOutput, PageAssetMap, propagate_assets};
pub use watcher::{ContentSession, ContentTracker, InitOutcome, WatchError};
