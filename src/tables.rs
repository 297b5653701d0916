//! Shared lookup tables
//!
//! The score table and the transform table are built once per process and
//! handed to every component by reference. With a cache directory they are
//! loaded from disk when a matching file exists.

use crate::core::ScoreTable;
use crate::storage::{StorageSpec, VersionedCache};
use crate::symmetry::TransformTable;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Schema version of cached tables; bump when their layout changes
pub const TABLE_VERSION: u32 = 1;

/// File prefix of the cached score table
pub const SCORE_TABLE_PREFIX: &str = "scoretable";

/// File prefix of the cached transform table
pub const TRANSFORM_TABLE_PREFIX: &str = "xftable";

/// Immutable tables shared by the solver
#[derive(Debug, Clone)]
pub struct Tables {
    pub scores: Arc<ScoreTable>,
    pub transforms: Arc<TransformTable>,
}

impl Tables {
    /// Build both tables in memory
    #[must_use]
    pub fn new() -> Self {
        Self::load_or_build(None)
    }

    /// Build both tables, going through the cache in `cache_dir` if given
    #[must_use]
    pub fn load_or_build(cache_dir: Option<&Path>) -> Self {
        let start = Instant::now();

        let scores = match cache_dir {
            Some(dir) => VersionedCache::new(StorageSpec::new(dir, SCORE_TABLE_PREFIX, TABLE_VERSION))
                .with_check(ScoreTable::is_well_formed)
                .get_or_compute(ScoreTable::new),
            None => ScoreTable::new(),
        };

        let transforms = match cache_dir {
            Some(dir) => {
                VersionedCache::new(StorageSpec::new(dir, TRANSFORM_TABLE_PREFIX, TABLE_VERSION))
                    .with_check(TransformTable::is_well_formed)
                    .get_or_compute(TransformTable::new)
            }
            None => TransformTable::new(),
        };

        info!("lookup tables ready in {:.2?}", start.elapsed());
        Self {
            scores: Arc::new(scores),
            transforms: Arc::new(transforms),
        }
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}
