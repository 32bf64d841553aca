//! CSV Data Loader Module
//! Loads the survey CSV with Polars and validates it into a typed table.

use super::table::{PersonalityTable, COUNTRY_COLUMN};
use polars::prelude::*;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("CSV file is empty: {}", .0.display())]
    EmptyFile(PathBuf),
    #[error("CSV file has no 'Country' column")]
    MissingCountryColumn,
    #[error("Invalid data in column '{column}': {detail}")]
    DataFormat { column: String, detail: String },
    #[error("Failed to read CSV file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Owns the loaded table for the lifetime of the host.
///
/// A failed load leaves an empty table behind so callers can keep rendering.
pub struct DataLoader {
    table: PersonalityTable,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            table: PersonalityTable::empty(),
            file_path: None,
        }
    }

    /// Load a CSV file, replacing the current table.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&PersonalityTable, LoaderError> {
        self.file_path = Some(file_path.to_path_buf());

        match read_table(file_path) {
            Ok(table) => {
                info!(
                    path = %file_path.display(),
                    rows = table.row_count(),
                    categories = table.categories().len(),
                    "loaded survey table"
                );
                self.table = table;
                Ok(&self.table)
            }
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "failed to load survey table");
                self.table = PersonalityTable::empty();
                Err(e)
            }
        }
    }

    /// Get a reference to the loaded table (empty if nothing loaded).
    pub fn table(&self) -> &PersonalityTable {
        &self.table
    }

    /// Get file path of the last load attempt.
    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

/// Read and validate a survey CSV from disk.
pub fn read_table(path: &Path) -> Result<PersonalityTable, LoaderError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoaderError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    if metadata.len() == 0 {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;
    debug!(height = df.height(), width = df.width(), "parsed csv");

    table_from_dataframe(&df)
}

/// Validate a raw DataFrame into a typed table.
///
/// Every column other than `Country` is a category and must hold a finite
/// number in every row. Country names must be present and unique.
pub fn table_from_dataframe(df: &DataFrame) -> Result<PersonalityTable, LoaderError> {
    let country_col = df
        .column(COUNTRY_COLUMN)
        .map_err(|_| LoaderError::MissingCountryColumn)?
        .cast(&DataType::String)?;
    let country_ca = country_col.as_materialized_series().str()?;

    let mut countries = Vec::with_capacity(df.height());
    let mut seen = HashSet::new();
    for (row, name) in country_ca.into_iter().enumerate() {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| LoaderError::DataFormat {
                column: COUNTRY_COLUMN.to_string(),
                detail: format!("missing country name in row {}", row + 1),
            })?;
        if !seen.insert(name) {
            return Err(LoaderError::DataFormat {
                column: COUNTRY_COLUMN.to_string(),
                detail: format!("duplicate country '{}' in row {}", name, row + 1),
            });
        }
        countries.push(name.to_string());
    }

    let categories: Vec<String> = df
        .get_column_names()
        .iter()
        .filter(|name| name.as_str() != COUNTRY_COLUMN)
        .map(|name| name.to_string())
        .collect();

    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(categories.len()); df.height()];
    for category in &categories {
        let column = df.column(category)?.cast(&DataType::Float64)?;
        let ca = column.f64()?;
        for (row, value) in ca.into_iter().enumerate() {
            match value {
                Some(v) if v.is_finite() => values[row].push(v),
                _ => {
                    return Err(LoaderError::DataFormat {
                        column: category.clone(),
                        detail: format!(
                            "missing or non-numeric value for '{}' in row {}",
                            countries[row],
                            row + 1
                        ),
                    })
                }
            }
        }
    }

    Ok(PersonalityTable::from_parts(countries, categories, values))
}
