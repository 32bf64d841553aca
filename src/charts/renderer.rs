//! Static Chart Renderer
//! Renders the dashboard bar charts to PNG files with plotters.
//!
//! Layout per image:
//! 1. Title centered on top
//! 2. One bar per label, highlighted bars in red
//! 3. Labels rotated under the x-axis, y-axis in percent

use super::BarSeries;
use crate::dashboard::{format_percent, DashboardReport};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const BAR: RGBColor = RGBColor(91, 155, 213);
const HIGHLIGHT: RGBColor = RGBColor(237, 125, 49);

/// Default export size in pixels
pub const EXPORT_SIZE: (u32, u32) = (1400, 800);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to draw chart '{chart}': {message}")]
    Drawing { chart: String, message: String },
    #[error("Nothing to export: {0}")]
    NothingToExport(String),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every available view of `report` into `dir` as `<id>.png`.
    pub fn export_report(
        report: &DashboardReport,
        dir: &Path,
        size: (u32, u32),
    ) -> Result<Vec<PathBuf>, RenderError> {
        if let Some(notice) = &report.notice {
            return Err(RenderError::NothingToExport(notice.clone()));
        }

        fs::create_dir_all(dir).map_err(|source| RenderError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        for series in BarSeries::from_report(report) {
            let path = dir.join(format!("{}.png", series.id));
            Self::render_bar_chart(&series, &path, size)?;
            info!(path = %path.display(), "exported chart");
            written.push(path);
        }
        Ok(written)
    }

    /// Render one bar chart to a PNG file.
    pub fn render_bar_chart(
        series: &BarSeries,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let drawing = |e: &dyn std::fmt::Display| RenderError::Drawing {
            chart: series.id.clone(),
            message: e.to_string(),
        };

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| drawing(&e))?;

        if series.is_empty() {
            Self::draw_empty(&root, &series.title).map_err(|e| drawing(&e))?;
        } else {
            Self::draw_bars(&root, series).map_err(|e| drawing(&e))?;
        }

        root.present().map_err(|e| drawing(&e))?;
        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        series: &BarSeries,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let n = series.values.len();
        let y_max = series.max_value() * 1.1;

        let mut chart = ChartBuilder::on(root)
            .caption(&series.title, ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(110)
            .y_label_area_size(70)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..y_max)?;

        let labels = &series.labels;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_style(
                ("sans-serif", 14)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc("Ratio")
            .y_label_formatter(&|v| format_percent(*v, 0))
            .draw()?;

        chart.draw_series(series.values.iter().zip(&series.highlight).enumerate().map(
            |(i, (&value, &highlighted))| {
                let color = if highlighted { HIGHLIGHT } else { BAR };
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), value)],
                    color.filled(),
                );
                bar.set_margin(0, 0, 4, 4);
                bar
            },
        ))?;

        Ok(())
    }

    fn draw_empty<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let (w, h) = root.dim_in_pixel();
        root.draw(&Text::new(
            format!("{}: no data", title),
            ((w / 2) as i32, (h / 2) as i32),
            ("sans-serif", 24)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::testing::{korea_japan, table};
    use tempfile::TempDir;

    const SMALL: (u32, u32) = (480, 320);

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn exports_one_png_per_view() {
        let dir = TempDir::new().unwrap();
        let report = DashboardReport::build(&korea_japan(), None, &DashboardConfig::default());

        let paths = StaticChartRenderer::export_report(&report, dir.path(), SMALL).unwrap();

        assert_eq!(
            file_names(&paths),
            vec!["distribution.png", "global_average.png", "ranked.png"]
        );
        for path in &paths {
            assert!(fs::metadata(path).unwrap().len() > 0, "{}", path.display());
        }
    }

    #[test]
    fn failed_ranked_view_is_not_exported() {
        let dir = TempDir::new().unwrap();
        let t = table(
            &["ISTP-A", "ENFP-T"],
            &[("South Korea", [0.05, 0.07]), ("Japan", [0.10, 0.02])],
        );
        let report = DashboardReport::build(&t, None, &DashboardConfig::default());
        assert!(report.ranked.is_err());

        let paths = StaticChartRenderer::export_report(&report, dir.path(), SMALL).unwrap();

        assert_eq!(
            file_names(&paths),
            vec!["distribution.png", "global_average.png"]
        );
        assert!(!dir.path().join("ranked.png").exists());
    }

    #[test]
    fn unavailable_report_exports_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("charts");
        let report = DashboardReport::unavailable("Data unavailable: CSV file not found");

        let err = StaticChartRenderer::export_report(&report, &out, EXPORT_SIZE).unwrap_err();

        assert!(matches!(err, RenderError::NothingToExport(msg) if msg.contains("not found")));
        assert!(!out.exists());
    }
}
