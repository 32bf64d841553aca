//! Chart Viewer Widget
//! Central scrollable area with the three dashboard sections.

use crate::charts::{BarSeries, ChartPlotter};
use crate::dashboard::DashboardReport;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 320.0;

const INFO_COLOR: Color32 = Color32::from_rgb(100, 149, 237);
const WARN_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Displays the current dashboard report.
#[derive(Default)]
pub struct ChartViewer {
    report: Option<DashboardReport>,
    series: Vec<BarSeries>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed report and rebuild its chart series
    pub fn set_report(&mut self, report: DashboardReport) {
        self.series = BarSeries::from_report(&report);
        self.report = Some(report);
    }

    pub fn report(&self) -> Option<&DashboardReport> {
        self.report.as_ref()
    }

    fn series(&self, id: &str) -> Option<&BarSeries> {
        self.series.iter().find(|s| s.id == id)
    }

    /// Draw the three sections, or the single notice when no data is available
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(report) = &self.report else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        if let Some(notice) = &report.notice {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(notice).size(18.0).color(WARN_COLOR));
            });
            return;
        }

        let country = report.selected_country.clone().unwrap_or_default();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                // ===== Country distribution =====
                ui.heading(format!("📊 {} type distribution", country));
                ui.add_space(5.0);
                if let Some(series) = self.series("distribution") {
                    ChartPlotter::draw_bar_chart(ui, series, CHART_HEIGHT);
                }
                Self::draw_message(ui, report.distribution_summary());

                ui.add_space(SECTION_SPACING);
                ui.separator();

                // ===== Global average =====
                ui.heading("🌍 Global average by type");
                ui.add_space(5.0);
                if let Some(series) = self.series("global_average") {
                    ChartPlotter::draw_bar_chart(ui, series, CHART_HEIGHT);
                }
                Self::draw_message(ui, report.global_caption());

                ui.add_space(SECTION_SPACING);
                ui.separator();

                // ===== Ranked pair =====
                match &report.ranked {
                    Ok(metric) => {
                        ui.heading(format!(
                            "🛠 {} (A+T) top {} & {}",
                            metric.pair.base_label(),
                            metric.top_n,
                            country
                        ));
                        ui.add_space(5.0);
                        Self::draw_message(ui, report.ranked_summary());
                        if let Some(series) = self.series("ranked") {
                            ChartPlotter::draw_bar_chart(ui, series, CHART_HEIGHT);
                        }
                        egui::CollapsingHeader::new("Detailed ranking data")
                            .default_open(false)
                            .show(ui, |ui| {
                                ChartPlotter::draw_ranked_table(ui, metric);
                            });
                    }
                    Err(_) => {
                        ui.heading("🛠 Ranked comparison");
                        Self::draw_message(ui, report.ranked_summary());
                    }
                }
            });
    }

    fn draw_message(ui: &mut egui::Ui, message: Result<String, String>) {
        match message {
            Ok(text) => ui.label(RichText::new(text).size(14.0).color(INFO_COLOR)),
            Err(text) => ui.label(RichText::new(text).size(14.0).color(WARN_COLOR)),
        };
    }
}
