//! Dashboard Configuration
//! Optional JSON settings file; every field falls back to a default.

use crate::stats::{RankedPair, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Survey CSV, relative to the working directory.
    pub data_path: PathBuf,
    /// Initial selection when present in the data.
    pub preferred_country: String,
    pub ranked_pair: RankedPair,
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("countries.csv"),
            preferred_country: "South Korea".to_string(),
            ranked_pair: RankedPair::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_csv;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "atlas.json", r#"{ "preferredCountry": "Japan", "topN": 5 }"#);

        let config = DashboardConfig::load(&path).unwrap();

        assert_eq!(config.preferred_country, "Japan");
        assert_eq!(config.top_n, 5);
        assert_eq!(config.data_path, PathBuf::from("countries.csv"));
        assert_eq!(config.ranked_pair, RankedPair::default());
    }

    #[test]
    fn ranked_pair_can_be_overridden() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "atlas.json",
            r#"{ "rankedPair": { "first": "ENFP-A", "second": "ENFP-T" } }"#,
        );

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.ranked_pair.base_label(), "ENFP");
    }

    #[test]
    fn malformed_json_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "broken.json", "{ topN: ");

        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = DashboardConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
