//! Personality Table Module
//! Typed, immutable country x category table produced by the loader.

/// Key column every input file must carry.
pub const COUNTRY_COLUMN: &str = "Country";

/// One row per country, one ratio per category column.
///
/// The table is validated once by the loader and never mutated afterwards;
/// every view borrows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalityTable {
    countries: Vec<String>,
    categories: Vec<String>,
    /// Row-major ratios: `values[row][category]`.
    values: Vec<Vec<f64>>,
}

impl PersonalityTable {
    /// Build a table from already validated parts.
    ///
    /// Every row in `values` must hold exactly one ratio per category.
    pub fn from_parts(
        countries: Vec<String>,
        categories: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(countries.len(), values.len());
        debug_assert!(values.iter().all(|row| row.len() == categories.len()));
        Self {
            countries,
            categories,
            values,
        }
    }

    /// Table with no rows and no categories, used when loading failed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.countries.len()
    }

    /// Country names in file order.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Category column names in file order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn row_of(&self, country: &str) -> Option<usize> {
        self.countries.iter().position(|c| c == country)
    }

    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }

    /// All ratios of one row, in category order.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row]
    }

    pub fn value(&self, row: usize, category: usize) -> f64 {
        self.values[row][category]
    }

    /// Ratios of one category across every row, in row order.
    pub fn column(&self, category: usize) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(move |row| row[category])
    }
}
