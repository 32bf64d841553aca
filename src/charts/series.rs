//! Chart-ready bar series built from the dashboard views.

use crate::dashboard::DashboardReport;
use crate::stats::{CategoryShare, CountryDistribution, GlobalAverage, RankLabel, RankedMetric};

/// One bar chart: a label, value and highlight flag per bar, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// Stable id for plot widgets and export file names.
    pub id: String,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub highlight: Vec<bool>,
}

impl BarSeries {
    fn from_shares(id: &str, title: String, shares: &[CategoryShare]) -> Self {
        Self {
            id: id.to_string(),
            title,
            labels: shares.iter().map(|s| s.category.clone()).collect(),
            values: shares.iter().map(|s| s.ratio).collect(),
            highlight: vec![false; shares.len()],
        }
    }

    pub fn distribution(dist: &CountryDistribution) -> Self {
        let mut series = Self::from_shares(
            "distribution",
            format!("{} type distribution", dist.country),
            &dist.entries,
        );
        if let Some(first) = series.highlight.first_mut() {
            *first = true;
        }
        series
    }

    pub fn global_average(avg: &GlobalAverage) -> Self {
        Self::from_shares("global_average", "Global average by type".to_string(), &avg.entries)
    }

    pub fn ranked(metric: &RankedMetric) -> Self {
        Self {
            id: "ranked".to_string(),
            title: format!(
                "{} (A+T) share: top {} + {}",
                metric.pair.base_label(),
                metric.top_n,
                metric.requested_country
            ),
            labels: metric.entries.iter().map(|e| e.country.clone()).collect(),
            values: metric.entries.iter().map(|e| e.combined).collect(),
            highlight: metric
                .entries
                .iter()
                .map(|e| e.label == RankLabel::SelectedCountry)
                .collect(),
        }
    }

    /// Series for every view that rendered, in dashboard order.
    pub fn from_report(report: &DashboardReport) -> Vec<Self> {
        let mut series = Vec::with_capacity(3);
        if let Ok(dist) = &report.distribution {
            series.push(Self::distribution(dist));
        }
        if let Ok(avg) = &report.global_average {
            series.push(Self::global_average(avg));
        }
        if let Ok(metric) = &report.ranked {
            series.push(Self::ranked(metric));
        }
        series
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest bar, at least a small positive floor for axis ranges.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.01, f64::max)
    }
}
