//! Incremental content tracking.
//!
//! # Architecture
//!
//! ```text
//! ContentWatcher (notify)
//!   - EventTranslator (known dirs, rename halves)
//!         |
//!         v  enqueue
//! ContentTracker (actor task)
//!   - BatchDebouncer
//!   - ContentSession
//!         - classify -> EventHandler
//!         |
//!    +-------------+-------------+
//!    |             |             |
//! CollectionDir  ConfigFile   EntryFile
//!         |
//!   ManifestWriter (once per batch)
//! ```

mod debouncer;
mod error;
pub mod fs;
mod handler;
pub mod handlers;
mod notifications;
mod session;
mod tracker;

pub use debouncer::BatchDebouncer;
pub use error::WatchError;
pub use fs::{ContentWatcher, EventTranslator};
pub use handler::{EventHandler, EventOutcome, TrackerState};
pub use notifications::{TrackerBroadcaster, TrackerEvent};
pub use session::{BatchReport, ContentSession, ContentSessionBuilder, InitOutcome};
pub use tracker::{ContentTracker, TrackerHandle, TrackerSnapshot};
