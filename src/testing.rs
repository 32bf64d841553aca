//! Shared fixtures for unit tests.

use crate::data::PersonalityTable;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Build a table from literal rows.
pub fn table<const N: usize>(categories: &[&str], rows: &[(&str, [f64; N])]) -> PersonalityTable {
    PersonalityTable::from_parts(
        rows.iter().map(|(country, _)| country.to_string()).collect(),
        categories.iter().map(|c| c.to_string()).collect(),
        rows.iter().map(|(_, values)| values.to_vec()).collect(),
    )
}

/// The two-country table used by the ranking scenarios.
pub fn korea_japan() -> PersonalityTable {
    table(
        &["ISTP-A", "ISTP-T"],
        &[("South Korea", [0.05, 0.03]), ("Japan", [0.10, 0.02])],
    )
}

/// Write `contents` to `name` inside `dir` and return the full path.
pub fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}
