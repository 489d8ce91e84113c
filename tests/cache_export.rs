use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use injury_impact::cache::{DatasetCache, content_digest};
use injury_impact::export::export_workbook;
use injury_impact::filter::Selection;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn read_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {err}", path.display()))
}

#[test]
fn unchanged_source_reuses_dataset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("injuries.csv");
    fs::write(&path, read_fixture("injuries.csv")).expect("write csv");

    let mut cache = DatasetCache::new();
    let first = cache.load(&path).expect("first load");
    let second = cache.load(&path).expect("second load");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn changed_source_recomputes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("injuries.csv");
    let raw = read_fixture("injuries.csv");
    fs::write(&path, &raw).expect("write csv");

    let mut cache = DatasetCache::new();
    let first = cache.load(&path).expect("first load");
    assert_eq!(first.len(), 6);

    let trimmed: String = raw.lines().take(3).map(|l| format!("{l}\n")).collect();
    fs::write(&path, trimmed).expect("rewrite csv");
    let second = cache.load(&path).expect("reload");
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 2);
    assert_eq!(cache.len(), 1);
}

#[test]
fn invalidate_forces_fresh_load() {
    let path = fixture_path("injuries.csv");
    let mut cache = DatasetCache::new();
    let first = cache.load(&path).expect("first load");
    assert!(cache.invalidate(&path));
    assert!(!cache.invalidate(&path));
    let second = cache.load(&path).expect("second load");
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(*first, *second);
}

#[test]
fn missing_source_is_not_cached() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cache = DatasetCache::new();
    let err = cache
        .load(&dir.path().join("absent.csv"))
        .expect_err("missing file must fail");
    assert!(err.is_source_unavailable());
    assert!(cache.is_empty());
}

#[test]
fn digest_tracks_content() {
    assert_eq!(content_digest(b"a,b\n1,2\n"), content_digest(b"a,b\n1,2\n"));
    assert_ne!(content_digest(b"a,b\n1,2\n"), content_digest(b"a,b\n1,3\n"));
}

#[test]
fn export_writes_filtered_sheets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("report.xlsx");
    let mut cache = DatasetCache::new();
    let dataset = cache.load(&fixture_path("injuries.csv")).expect("fixture should load");

    let all = export_workbook(&out, &dataset, &Selection::all()).expect("export all");
    assert_eq!(all.injuries, 6);
    assert_eq!(all.teams, 2);
    assert_eq!(all.timeline, 19);
    let size = fs::metadata(&out).expect("workbook exists").len();
    assert!(size > 0);

    let alpha = export_workbook(&out, &dataset, &Selection::with_teams(["Alpha FC"]))
        .expect("export alpha");
    assert_eq!(alpha.injuries, 3);
    assert_eq!(alpha.teams, 1);
    assert_eq!(alpha.timeline, 10);
}
