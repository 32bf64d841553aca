//! Aggregation Module
//! Derives the three dashboard views from the survey table: a country's
//! category distribution, the global per-category mean, and the ranked
//! combined share of one variant pair.

use crate::data::PersonalityTable;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Number of leading countries shown in the ranked view.
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("No data loaded")]
    EmptyTable,
    #[error("Country '{0}' was not found in the data")]
    NotFound(String),
    #[error(
        "Missing column(s) {} (expected {})",
        .missing.join(", "),
        .expected.join(", ")
    )]
    SchemaMismatch {
        expected: Vec<String>,
        missing: Vec<String>,
    },
}

/// One category and its ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub ratio: f64,
}

/// A country's ratios, highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryDistribution {
    pub country: String,
    pub entries: Vec<CategoryShare>,
}

impl CountryDistribution {
    /// The most common category.
    pub fn top(&self) -> Option<&CategoryShare> {
        self.entries.first()
    }
}

/// Mean ratio of every category across all countries, highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalAverage {
    pub entries: Vec<CategoryShare>,
    pub country_count: usize,
}

/// The two variant columns summed by the ranked view, e.g. `ISTP-A` + `ISTP-T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPair {
    pub first: String,
    pub second: String,
}

impl Default for RankedPair {
    fn default() -> Self {
        Self {
            first: "ISTP-A".to_string(),
            second: "ISTP-T".to_string(),
        }
    }
}

impl RankedPair {
    /// Shared base label (`ISTP` for `ISTP-A`/`ISTP-T`), or both names joined.
    pub fn base_label(&self) -> String {
        match (self.first.rsplit_once('-'), self.second.rsplit_once('-')) {
            (Some((a, _)), Some((b, _))) if a == b => a.to_string(),
            _ => format!("{}+{}", self.first, self.second),
        }
    }

    fn columns(&self) -> Vec<String> {
        vec![self.first.clone(), self.second.clone()]
    }
}

/// Display tag of a row in the ranked view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankLabel {
    TopRank,
    SelectedCountry,
}

impl fmt::Display for RankLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankLabel::TopRank => write!(f, "Top Rank"),
            RankLabel::SelectedCountry => write!(f, "Selected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub rank: usize,
    pub country: String,
    pub combined: f64,
    pub label: RankLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRank {
    pub country: String,
    pub rank: usize,
    pub combined: f64,
}

/// Top-N countries by combined pair share, plus the selected country.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMetric {
    pub pair: RankedPair,
    /// At most `top_n + 1` rows: the head of the ranking, then the selected
    /// country if it ranked below the head.
    pub entries: Vec<RankedEntry>,
    pub top_n: usize,
    pub requested_country: String,
    pub selected: Option<SelectedRank>,
    pub total_countries: usize,
}

impl RankedMetric {
    /// Rank of the requested country, or `NotFound` if it is not in the table.
    pub fn selected(&self) -> Result<&SelectedRank, ViewError> {
        self.selected
            .as_ref()
            .ok_or_else(|| ViewError::NotFound(self.requested_country.clone()))
    }
}

/// Pure view computations over an immutable table.
pub struct Aggregator;

impl Aggregator {
    /// Ratios of one country, sorted descending. Ties keep column order.
    pub fn country_distribution(
        table: &PersonalityTable,
        country: &str,
    ) -> Result<CountryDistribution, ViewError> {
        if table.is_empty() {
            return Err(ViewError::EmptyTable);
        }
        let row = table
            .row_of(country)
            .ok_or_else(|| ViewError::NotFound(country.to_string()))?;

        let mut entries: Vec<CategoryShare> = table
            .categories()
            .iter()
            .zip(table.row(row))
            .map(|(category, &ratio)| CategoryShare {
                category: category.clone(),
                ratio,
            })
            .collect();
        sort_shares_descending(&mut entries);

        Ok(CountryDistribution {
            country: country.to_string(),
            entries,
        })
    }

    /// Arithmetic mean of each category over every row, sorted descending.
    /// Ties keep column order.
    pub fn global_average(table: &PersonalityTable) -> Result<GlobalAverage, ViewError> {
        if table.is_empty() {
            return Err(ViewError::EmptyTable);
        }

        // Use rayon to reduce columns independently; collect keeps column order
        let mut entries: Vec<CategoryShare> = table
            .categories()
            .par_iter()
            .enumerate()
            .map(|(idx, category)| CategoryShare {
                category: category.clone(),
                ratio: table.column(idx).mean(),
            })
            .collect();
        sort_shares_descending(&mut entries);

        Ok(GlobalAverage {
            entries,
            country_count: table.row_count(),
        })
    }

    /// Rank every country by `pair.first + pair.second`, descending.
    ///
    /// Ties keep row order. The selected country is relabelled in place when
    /// it is among the first `top_n`, otherwise appended as one extra row.
    /// An unknown selection still yields the top list; see
    /// [`RankedMetric::selected`].
    pub fn ranked_metric(
        table: &PersonalityTable,
        pair: &RankedPair,
        country: &str,
        top_n: usize,
    ) -> Result<RankedMetric, ViewError> {
        if table.is_empty() {
            return Err(ViewError::EmptyTable);
        }

        let missing: Vec<String> = pair
            .columns()
            .into_iter()
            .filter(|c| table.category_index(c).is_none())
            .collect();
        let (Some(first), Some(second)) = (
            table.category_index(&pair.first),
            table.category_index(&pair.second),
        ) else {
            return Err(ViewError::SchemaMismatch {
                expected: pair.columns(),
                missing,
            });
        };

        let mut ordered: Vec<(usize, f64)> = (0..table.row_count())
            .map(|row| (row, table.value(row, first) + table.value(row, second)))
            .collect();
        ordered.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let countries = table.countries();
        let selected = ordered
            .iter()
            .position(|&(row, _)| countries[row] == country)
            .map(|pos| SelectedRank {
                country: country.to_string(),
                rank: pos + 1,
                combined: ordered[pos].1,
            });

        let mut entries: Vec<RankedEntry> = ordered
            .iter()
            .take(top_n)
            .enumerate()
            .map(|(pos, &(row, combined))| RankedEntry {
                rank: pos + 1,
                country: countries[row].clone(),
                combined,
                label: if countries[row] == country {
                    RankLabel::SelectedCountry
                } else {
                    RankLabel::TopRank
                },
            })
            .collect();

        if let Some(sel) = selected.as_ref().filter(|s| s.rank > top_n) {
            entries.push(RankedEntry {
                rank: sel.rank,
                country: sel.country.clone(),
                combined: sel.combined,
                label: RankLabel::SelectedCountry,
            });
        }

        Ok(RankedMetric {
            pair: pair.clone(),
            entries,
            top_n,
            requested_country: country.to_string(),
            selected,
            total_countries: table.row_count(),
        })
    }
}

/// Stable descending sort, so equal ratios keep their original order.
fn sort_shares_descending(entries: &mut [CategoryShare]) {
    entries.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{korea_japan, table};
    use rstest::rstest;

    const EPS: f64 = 1e-12;

    fn ratio_of(avg: &GlobalAverage, category: &str) -> Option<f64> {
        avg.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.ratio)
    }

    fn twelve_countries() -> PersonalityTable {
        // Country i has combined share (12 - i) / 100, so rank == i + 1.
        let names: Vec<String> = (0..12).map(|i| format!("Country{:02}", i)).collect();
        let values: Vec<Vec<f64>> = (0..12)
            .map(|i| vec![(12 - i) as f64 / 200.0, (12 - i) as f64 / 200.0, 0.5])
            .collect();
        PersonalityTable::from_parts(
            names,
            vec!["ISTP-A".into(), "ISTP-T".into(), "ENFP-A".into()],
            values,
        )
    }

    #[test]
    fn distribution_matches_row_and_is_sorted() {
        let t = table(
            &["ENFP-A", "ENFP-T", "ISTP-A", "ISTP-T"],
            &[
                ("Japan", [0.02, 0.09, 0.10, 0.02]),
                ("Brazil", [0.08, 0.07, 0.01, 0.03]),
            ],
        );

        let dist = Aggregator::country_distribution(&t, "Brazil").unwrap();

        assert_eq!(dist.entries.len(), t.categories().len());
        for share in &dist.entries {
            let idx = t.category_index(&share.category).unwrap();
            assert_eq!(share.ratio, t.value(1, idx));
        }
        assert!(dist.entries.windows(2).all(|w| w[0].ratio >= w[1].ratio));
        let top = dist.top().unwrap();
        assert_eq!(top.category, "ENFP-A");
        assert_eq!(top.ratio, 0.08);
    }

    #[test]
    fn distribution_ties_keep_column_order() {
        let t = table(&["A-A", "B-A", "C-A"], &[("Peru", [0.1, 0.3, 0.3])]);

        let dist = Aggregator::country_distribution(&t, "Peru").unwrap();
        let order: Vec<&str> = dist.entries.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(order, vec!["B-A", "C-A", "A-A"]);
    }

    #[test]
    fn distribution_unknown_country_is_not_found() {
        let err = Aggregator::country_distribution(&korea_japan(), "Atlantis").unwrap_err();
        assert_eq!(err, ViewError::NotFound("Atlantis".to_string()));
    }

    #[test]
    fn global_average_is_column_mean() {
        let t = table(
            &["INTJ-A", "ISTP-A", "ESFJ-T"],
            &[
                ("Japan", [0.10, 0.20, 0.05]),
                ("Brazil", [0.30, 0.10, 0.05]),
                ("Kenya", [0.20, 0.00, 0.20]),
            ],
        );

        let avg = Aggregator::global_average(&t).unwrap();

        assert_eq!(avg.country_count, 3);
        assert!((ratio_of(&avg, "INTJ-A").unwrap() - 0.20).abs() < EPS);
        assert!((ratio_of(&avg, "ISTP-A").unwrap() - 0.10).abs() < EPS);
        assert!((ratio_of(&avg, "ESFJ-T").unwrap() - 0.10).abs() < EPS);
        assert_eq!(avg.entries[0].category, "INTJ-A");
        assert!(avg.entries.windows(2).all(|w| w[0].ratio >= w[1].ratio));
    }

    #[rstest]
    #[case::distribution(
        Aggregator::country_distribution(&PersonalityTable::empty(), "Japan").err()
    )]
    #[case::average(Aggregator::global_average(&PersonalityTable::empty()).err())]
    #[case::ranked(
        Aggregator::ranked_metric(&PersonalityTable::empty(), &RankedPair::default(), "Japan", 10)
            .err()
    )]
    fn empty_table_suppresses_every_view(#[case] err: Option<ViewError>) {
        assert_eq!(err, Some(ViewError::EmptyTable));
    }

    #[test]
    fn ranks_korea_second_of_two() {
        let metric = Aggregator::ranked_metric(
            &korea_japan(),
            &RankedPair::default(),
            "South Korea",
            DEFAULT_TOP_N,
        )
        .unwrap();

        let sel = metric.selected().unwrap();
        assert_eq!(sel.rank, 2);
        assert!((sel.combined - 0.08).abs() < EPS);
        assert_eq!(metric.total_countries, 2);

        assert_eq!(metric.entries.len(), 2);
        assert_eq!(metric.entries[0].country, "Japan");
        assert!((metric.entries[0].combined - 0.12).abs() < EPS);
        assert_eq!(metric.entries[0].label, RankLabel::TopRank);
        assert_eq!(metric.entries[1].label, RankLabel::SelectedCountry);
    }

    #[test]
    fn selection_outside_top_n_is_appended_once() {
        let metric =
            Aggregator::ranked_metric(&twelve_countries(), &RankedPair::default(), "Country11", 10)
                .unwrap();

        assert_eq!(metric.entries.len(), 11);
        assert!(metric.entries[..10]
            .iter()
            .all(|e| e.label == RankLabel::TopRank));
        let last = metric.entries.last().unwrap();
        assert_eq!(last.country, "Country11");
        assert_eq!(last.rank, 12);
        assert_eq!(last.label, RankLabel::SelectedCountry);
    }

    #[test]
    fn selection_inside_top_n_is_relabelled_in_place() {
        let metric =
            Aggregator::ranked_metric(&twelve_countries(), &RankedPair::default(), "Country03", 10)
                .unwrap();

        assert_eq!(metric.entries.len(), 10);
        let selected: Vec<&RankedEntry> = metric
            .entries
            .iter()
            .filter(|e| e.label == RankLabel::SelectedCountry)
            .collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].country, "Country03");
        assert_eq!(selected[0].rank, 4);
    }

    #[test]
    fn rank_counts_strictly_greater_values() {
        let t = twelve_countries();
        let pair = RankedPair::default();
        for (row, country) in t.countries().iter().enumerate() {
            let metric = Aggregator::ranked_metric(&t, &pair, country, 10).unwrap();
            let mine = t.value(row, 0) + t.value(row, 1);
            let greater = (0..t.row_count())
                .filter(|&r| t.value(r, 0) + t.value(r, 1) > mine)
                .count();
            assert_eq!(metric.selected().unwrap().rank, greater + 1);
        }
    }

    #[test]
    fn ties_keep_row_order() {
        let t = table(
            &["ISTP-A", "ISTP-T"],
            &[
                ("Chile", [0.25, 0.25]),
                ("Norway", [0.125, 0.125]),
                ("Ghana", [0.375, 0.125]),
            ],
        );

        let metric = Aggregator::ranked_metric(&t, &RankedPair::default(), "Ghana", 10).unwrap();

        let order: Vec<&str> = metric.entries.iter().map(|e| e.country.as_str()).collect();
        assert_eq!(order, vec!["Chile", "Ghana", "Norway"]);
        assert_eq!(metric.selected().unwrap().rank, 2);
    }

    #[test]
    fn single_row_table_ranks_first_without_extra_row() {
        let t = table(&["ISTP-A", "ISTP-T"], &[("Malta", [0.03, 0.04])]);

        let metric = Aggregator::ranked_metric(&t, &RankedPair::default(), "Malta", 10).unwrap();

        assert_eq!(metric.entries.len(), 1);
        assert_eq!(metric.entries[0].label, RankLabel::SelectedCountry);
        assert_eq!(metric.selected().unwrap().rank, 1);
    }

    #[test]
    fn ranked_metric_is_idempotent() {
        let t = twelve_countries();
        let pair = RankedPair::default();
        let first = Aggregator::ranked_metric(&t, &pair, "Country07", 10).unwrap();
        let second = Aggregator::ranked_metric(&t, &pair, "Country07", 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_variant_column_is_schema_mismatch() {
        let t = table(&["ISTP-A", "ENFP-T"], &[("Japan", [0.1, 0.2])]);

        let err = Aggregator::ranked_metric(&t, &RankedPair::default(), "Japan", 10).unwrap_err();

        assert_eq!(
            err,
            ViewError::SchemaMismatch {
                expected: vec!["ISTP-A".into(), "ISTP-T".into()],
                missing: vec!["ISTP-T".into()],
            }
        );
        assert!(err.to_string().contains("ISTP-T"));
    }

    #[test]
    fn unknown_selection_still_lists_top_countries() {
        let metric =
            Aggregator::ranked_metric(&korea_japan(), &RankedPair::default(), "Atlantis", 10)
                .unwrap();

        assert_eq!(metric.entries.len(), 2);
        assert!(metric.entries.iter().all(|e| e.label == RankLabel::TopRank));
        assert_eq!(
            metric.selected().unwrap_err(),
            ViewError::NotFound("Atlantis".to_string())
        );
    }

    #[rstest]
    #[case("ISTP-A", "ISTP-T", "ISTP")]
    #[case("ISTP-A", "ENFP-T", "ISTP-A+ENFP-T")]
    #[case("Introvert", "Extravert", "Introvert+Extravert")]
    fn base_label_strips_shared_suffix(
        #[case] first: &str,
        #[case] second: &str,
        #[case] expected: &str,
    ) {
        let pair = RankedPair {
            first: first.to_string(),
            second: second.to_string(),
        };
        assert_eq!(pair.base_label(), expected);
    }
}
