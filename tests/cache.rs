//! Lookup tables through the on-disk cache.

use std::fs;

use mastermind_tree::core::{Code, ScoreTable};
use mastermind_tree::storage::{StorageSpec, VersionedCache};
use mastermind_tree::symmetry::NTRANSFORMS;
use mastermind_tree::tables::{SCORE_TABLE_PREFIX, TABLE_VERSION, TRANSFORM_TABLE_PREFIX, Tables};

fn sample_pairs() -> Vec<(Code, Code)> {
    [(0, 0), (0, 1), (7, 51), (1295, 8), (600, 601)]
        .into_iter()
        .map(|(a, b)| (Code::new(a).unwrap(), Code::new(b).unwrap()))
        .collect()
}

#[test]
fn tables_round_trip_through_cache() {
    let dir = tempfile::tempdir().unwrap();

    let built = Tables::load_or_build(Some(dir.path()));
    for prefix in [SCORE_TABLE_PREFIX, TRANSFORM_TABLE_PREFIX] {
        let spec = StorageSpec::new(dir.path(), prefix, TABLE_VERSION);
        assert!(spec.path.exists(), "{} missing", spec.path.display());
    }

    let loaded = Tables::load_or_build(Some(dir.path()));
    for (a, b) in sample_pairs() {
        assert_eq!(loaded.scores.score(a, b), built.scores.score(a, b));
    }
    assert_eq!(loaded.transforms.all().len(), NTRANSFORMS);
    assert_eq!(loaded.transforms.all(), built.transforms.all());

    // A second load reads the files rather than rotating them
    let rotated = dir.path().join(format!("{SCORE_TABLE_PREFIX}.v{TABLE_VERSION}.bin.1"));
    assert!(!rotated.exists());
}

#[test]
fn corrupt_score_table_is_rebuilt() {
    let dir = tempfile::tempdir().unwrap();
    let spec = StorageSpec::new(dir.path(), SCORE_TABLE_PREFIX, TABLE_VERSION);
    fs::write(&spec.path, b"not a score table").unwrap();

    let tables = Tables::load_or_build(Some(dir.path()));
    assert!(tables.scores.is_well_formed());

    let cache = VersionedCache::<ScoreTable>::new(spec).with_check(ScoreTable::is_well_formed);
    let reloaded = cache.load().expect("rebuilt table was stored");
    for (a, b) in sample_pairs() {
        assert_eq!(reloaded.score(a, b), tables.scores.score(a, b));
    }
}

#[test]
fn stale_version_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let old = VersionedCache::<Vec<u8>>::new(StorageSpec::new(dir.path(), "table", 1));
    old.store(&vec![1, 2, 3]).unwrap();

    // Same file name, newer schema
    let mut spec = StorageSpec::new(dir.path(), "table", 2);
    spec.path = old.spec().path.clone();
    let new = VersionedCache::<Vec<u8>>::new(spec);

    assert!(new.load().is_none());
    assert!(!new.spec().path.exists());
    assert_eq!(new.get_or_compute(|| vec![9]), vec![9]);
    assert_eq!(new.load(), Some(vec![9]));
}
