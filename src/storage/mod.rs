//! Persistent storage for expensive lookup tables

mod cache;

pub use cache::{StorageSpec, VersionedCache};
