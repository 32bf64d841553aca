//! Dashboard Report
//! Composes the three views and their summary sentences for one selection.
//! Each view degrades on its own; an empty table collapses everything into a
//! single notice.

use crate::config::DashboardConfig;
use crate::data::PersonalityTable;
use crate::stats::{
    Aggregator, CountryDistribution, GlobalAverage, RankedMetric, RankedPair, ViewError,
};
use std::fmt;
use tracing::{debug, warn};

/// Format a ratio as a percentage, e.g. `0.1234` -> `12.3%`.
pub fn format_percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

/// Preferred country if present, else the first row.
pub fn default_country(table: &PersonalityTable, preferred: &str) -> Option<String> {
    if table.row_of(preferred).is_some() {
        Some(preferred.to_string())
    } else {
        table.countries().first().cloned()
    }
}

/// `requested` when the table has it, otherwise [`default_country`].
pub fn resolve_country(
    table: &PersonalityTable,
    requested: Option<&str>,
    preferred: &str,
) -> Option<String> {
    match requested {
        Some(country) if table.row_of(country).is_some() => Some(country.to_string()),
        Some(country) => {
            warn!(country = %country, "requested country not in data, using default");
            default_country(table, preferred)
        }
        None => default_country(table, preferred),
    }
}

/// Everything the renderers need for one selection.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub selected_country: Option<String>,
    /// Set when nothing can be shown at all.
    pub notice: Option<String>,
    pub distribution: Result<CountryDistribution, ViewError>,
    pub global_average: Result<GlobalAverage, ViewError>,
    pub ranked: Result<RankedMetric, ViewError>,
}

impl DashboardReport {
    /// Recompute every view for `selected` (or the default selection).
    pub fn build(
        table: &PersonalityTable,
        selected: Option<&str>,
        config: &DashboardConfig,
    ) -> Self {
        if table.is_empty() {
            return Self::unavailable("Data unavailable: the survey table has no rows.");
        }

        let country = selected
            .map(str::to_string)
            .or_else(|| default_country(table, &config.preferred_country))
            .unwrap_or_default();
        debug!(country = %country, "building dashboard views");

        let distribution = Aggregator::country_distribution(table, &country);
        let global_average = Aggregator::global_average(table);
        let ranked = Aggregator::ranked_metric(table, &config.ranked_pair, &country, config.top_n);

        for err in [distribution.as_ref().err(), ranked.as_ref().err()]
            .into_iter()
            .flatten()
        {
            warn!(error = %err, "dashboard view unavailable");
        }

        Self {
            selected_country: Some(country),
            notice: None,
            distribution,
            global_average,
            ranked,
        }
    }

    /// Report with every view suppressed behind one message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            selected_country: None,
            notice: Some(message.into()),
            distribution: Err(ViewError::EmptyTable),
            global_average: Err(ViewError::EmptyTable),
            ranked: Err(ViewError::EmptyTable),
        }
    }

    /// Highlight sentence for the selected country, or why it is missing.
    pub fn distribution_summary(&self) -> Result<String, String> {
        let dist = self.distribution.as_ref().map_err(unavailable_text)?;
        let top = dist
            .top()
            .ok_or_else(|| "Data unavailable: the survey table has no type columns.".to_string())?;
        Ok(format!(
            "In {}, the most common type is {} ({}).",
            dist.country,
            top.category,
            format_percent(top.ratio, 1)
        ))
    }

    pub fn global_caption(&self) -> Result<String, String> {
        let avg = self.global_average.as_ref().map_err(unavailable_text)?;
        Ok(format!(
            "Simple mean over all {} countries.",
            avg.country_count
        ))
    }

    /// Rank sentence, e.g. "... ranking 2 of 2 countries."
    pub fn ranked_summary(&self) -> Result<String, String> {
        let metric = self.ranked.as_ref().map_err(unavailable_text)?;
        let sel = metric.selected().map_err(|e| e.to_string())?;
        Ok(format!(
            "{}'s {} (A+T combined) share is {}, ranking {} of {} countries.",
            sel.country,
            metric.pair.base_label(),
            format_percent(sel.combined, 1),
            sel.rank,
            metric.total_countries
        ))
    }
}

fn unavailable_text(err: &ViewError) -> String {
    match err {
        ViewError::SchemaMismatch { expected, .. } => format!(
            "Data unavailable: {}. The {} analysis needs columns {}.",
            err,
            base_of(expected),
            expected.join(" and ")
        ),
        _ => format!("Data unavailable: {}.", err),
    }
}

fn base_of(expected: &[String]) -> String {
    match expected {
        [first, second] => RankedPair {
            first: first.clone(),
            second: second.clone(),
        }
        .base_label(),
        _ => expected.join("+"),
    }
}

impl fmt::Display for DashboardReport {
    /// Plain-text rendition used by `--report`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(notice) = &self.notice {
            return writeln!(f, "{}", notice);
        }

        let country = self.selected_country.as_deref().unwrap_or("-");
        writeln!(f, "== {} type distribution ==", country)?;
        match self.distribution_summary() {
            Ok(summary) => {
                for share in self.distribution.iter().flat_map(|d| &d.entries) {
                    writeln!(f, "  {:<8} {:>6}", share.category, format_percent(share.ratio, 1))?;
                }
                writeln!(f, "{}", summary)?;
            }
            Err(msg) => writeln!(f, "{}", msg)?,
        }

        writeln!(f)?;
        writeln!(f, "== Global average by type ==")?;
        match self.global_caption() {
            Ok(caption) => {
                for share in self.global_average.iter().flat_map(|a| &a.entries) {
                    writeln!(f, "  {:<8} {:>6}", share.category, format_percent(share.ratio, 1))?;
                }
                writeln!(f, "{}", caption)?;
            }
            Err(msg) => writeln!(f, "{}", msg)?,
        }

        writeln!(f)?;
        match &self.ranked {
            Ok(metric) => {
                writeln!(
                    f,
                    "== {} (A+T) top {} + {} ==",
                    metric.pair.base_label(),
                    metric.top_n,
                    country
                )?;
                for entry in &metric.entries {
                    writeln!(
                        f,
                        "  {:>3}. {:<24} {:>7}  {}",
                        entry.rank,
                        entry.country,
                        format_percent(entry.combined, 2),
                        entry.label
                    )?;
                }
                match self.ranked_summary() {
                    Ok(summary) | Err(summary) => writeln!(f, "{}", summary)?,
                }
            }
            Err(err) => writeln!(f, "{}", unavailable_text(err))?,
        }
        Ok(())
    }
}
