//! Handler implementations for the content tracker.

mod config;
mod directory;
mod entry;

pub use config::ConfigFileHandler;
pub use directory::CollectionDirHandler;
pub use entry::EntryFileHandler;
