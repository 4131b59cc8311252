// Unit tests for loading and partitioning interaction logs.
//
// Fixture logs are written to the system temp directory.

use std::fs;
use std::path::PathBuf;

use cofi::data::loader::{self, Record};
use cofi::data::partition::Partition;
use cofi::data::Dataset;
use cofi::error::CofiError;

fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cofi-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

fn records(pairs: &[(&str, &str)]) -> Vec<Record> {
    pairs
        .iter()
        .map(|(u, i)| Record {
            user: u.to_string(),
            item: i.to_string(),
        })
        .collect()
}

// ============================================================
// Loader
// ============================================================

#[test]
fn load_file_reads_every_record() {
    let path = write_fixture(
        "ok.dat",
        "1::1193::5::978300760\n1::661::3::978302109\n\n2::1193::4::978298413\n",
    );
    let loaded = loader::load_file(&path, "::").unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[2].user, "2");
    assert_eq!(loaded[2].item, "1193");
}

#[test]
fn load_file_custom_delimiter() {
    let path = write_fixture("tabs.tsv", "u1\ti1\t1\t0\nu2\ti1\t1\t0\n");
    let loaded = loader::load_file(&path, "\t").unwrap();
    fs::remove_file(&path).ok();
    assert_eq!(loaded.len(), 2);
}

#[test]
fn malformed_line_aborts_with_line_number() {
    let path = write_fixture("bad.dat", "1::10::5::0\n2::10::4::0\n3::10::4\n");
    let err = loader::load_file(&path, "::").unwrap_err();
    fs::remove_file(&path).ok();

    match err {
        CofiError::InvalidInput { line, reason } => {
            assert_eq!(line, 3);
            assert!(reason.contains("found 3"), "reason: {reason}");
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("cofi-definitely-missing.dat");
    assert!(matches!(
        loader::load_file(&path, "::"),
        Err(CofiError::Io(_))
    ));
}

// ============================================================
// Partition and Dataset
// ============================================================

#[test]
fn split_is_deterministic_and_order_independent() {
    let forward: Vec<Record> = (0..40)
        .flat_map(|u| (0..5).map(move |i| (u.to_string(), (u * 3 + i).to_string())))
        .map(|(user, item)| Record { user, item })
        .collect();
    let mut backward = forward.clone();
    backward.reverse();

    let partition = Partition::new(8, 3, 2024).unwrap();
    let a = Dataset::split(&forward, &partition);
    let b = Dataset::split(&backward, &partition);

    assert_eq!(a.train, b.train);
    assert_eq!(a.test, b.test);
}

#[test]
fn roughly_one_bucket_is_held_out() {
    let all: Vec<Record> = (0..200)
        .flat_map(|u| (0..10).map(move |i| (u.to_string(), i.to_string())))
        .map(|(user, item)| Record { user, item })
        .collect();
    let dataset = Dataset::split(&all, &Partition::new(4, 0, 7).unwrap());

    // 2000 records over 5 buckets: expect ~400 in test
    let held_out = dataset.test.interaction_count();
    assert!((250..550).contains(&held_out), "held out {held_out}");
    assert_eq!(held_out + dataset.train.interaction_count(), 2000);
}

#[test]
fn interning_follows_natural_id_order() {
    let dataset = Dataset::split(
        &records(&[("10", "b"), ("9", "a"), ("x", "a")]),
        &Partition::default(),
    );
    assert_eq!(dataset.users.id("9"), Some(0));
    assert_eq!(dataset.users.id("10"), Some(1));
    assert_eq!(dataset.users.id("x"), Some(2));
    assert_eq!(dataset.items.id("a"), Some(0));
}

#[test]
fn stats_report_split_sizes() {
    let dataset = Dataset::split(
        &records(&[("1", "a"), ("1", "b"), ("2", "a"), ("3", "c")]),
        &Partition::default(),
    );
    let stats = dataset.stats();
    assert_eq!(stats.users, 3);
    assert_eq!(stats.items, 3);
    assert_eq!(stats.train_interactions + stats.test_interactions, 4);
    assert!((0.0..=1.0).contains(&stats.train_density));
}
