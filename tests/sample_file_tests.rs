#![cfg(feature = "sample-file")]

//! Reading sample files from disk.

use std::io::Write;
use std::path::PathBuf;

use priors::config::{Section, distribution_from_section};
use priors::store::read_samples;
use priors::{BoundedDistribution, Bounds, Error, FromFile, ParamValues};

fn temp_path() -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut path = std::env::temp_dir();
    path.push(format!(
        "priors_sample_file_test_{}_{}.json",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    path
}

fn write_samples(columns: &[(&str, Vec<f64>)]) -> PathBuf {
    let object: serde_json::Map<String, serde_json::Value> = columns
        .iter()
        .map(|(name, values)| ((*name).to_owned(), serde_json::json!(values)))
        .collect();
    let path = temp_path();
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(serde_json::to_string(&object).unwrap().as_bytes())
        .unwrap();
    path
}

fn column(n: u32, shift: f64) -> Vec<f64> {
    (0..n)
        .map(|i| (f64::from(i) * 0.61 + shift).cos() * 2.0 + 5.0)
        .collect()
}

#[test]
fn open_reads_requested_columns() {
    let path = write_samples(&[
        ("mass1", column(150, 0.0)),
        ("mass2", column(150, 0.7)),
        ("unused", column(150, 1.3)),
    ]);
    let dist = FromFile::open(&path, [("mass1", None), ("mass2", None)]).unwrap();
    assert_eq!(dist.params(), ["mass1".to_owned(), "mass2".to_owned()]);
    assert_eq!(dist.sample_count(), 150);
    assert_eq!(dist.file_name(), Some(path.as_path()));
    assert!(dist.pdf(&ParamValues::from([("mass1", 5.0), ("mass2", 5.0)])).unwrap() > 0.0);
    std::fs::remove_file(&path).ok();
}

#[test]
fn open_reports_missing_column() {
    let path = write_samples(&[("mass1", column(20, 0.0))]);
    let result = FromFile::open(&path, [("mass1", None), ("spin", None)]);
    assert!(matches!(result, Err(Error::MissingParameter(p)) if p == "spin"));
    std::fs::remove_file(&path).ok();
}

#[test]
fn open_missing_file() {
    let path = temp_path();
    let result = FromFile::open(&path, [("x", None::<Bounds>)]);
    assert!(matches!(result, Err(Error::SampleStore(_))));
}

#[test]
fn store_keeps_file_order() {
    let path = write_samples(&[("b", vec![1.0]), ("a", vec![2.0])]);
    let columns = read_samples(&path, None).unwrap();
    let names: Vec<&str> = columns.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(names, ["b", "a"]);
    std::fs::remove_file(&path).ok();
}

#[test]
fn fromfile_section() {
    let path = write_samples(&[("chirp", column(120, 0.2))]);
    let section = Section::new("chirp")
        .option("name", "fromfile")
        .option("file_name", path.to_string_lossy())
        .option("min-chirp", "4")
        .option("max-chirp", "6");
    let dist = distribution_from_section(&section).unwrap();
    assert_eq!(dist.name(), "fromfile");

    let mut rng = fastrand::Rng::with_seed(31);
    let draws = dist.rvs(100, None, &mut rng).unwrap();
    assert!(draws.get("chirp").unwrap().iter().all(|x| (4.0..6.0).contains(x)));
    assert_eq!(
        dist.pdf(&ParamValues::from([("chirp", 7.0)])).unwrap(),
        0.0
    );
    std::fs::remove_file(&path).ok();
}
