//! Chart Plotter Module
//! Draws the dashboard bar charts and ranking table using egui_plot.

use super::BarSeries;
use crate::dashboard::format_percent;
use crate::stats::{RankLabel, RankedMetric};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Plot};

/// Default bar colour
pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
/// Selected country / top type
pub const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

/// Creates interactive bar charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn bar_color(highlighted: bool) -> Color32 {
        if highlighted {
            HIGHLIGHT_COLOR
        } else {
            BAR_COLOR
        }
    }

    /// Draw a vertical bar chart.
    /// X-axis: one slot per label, Y-axis: ratio shown as percent
    pub fn draw_bar_chart(ui: &mut egui::Ui, series: &BarSeries, height: f32) {
        let bars: Vec<Bar> = series
            .values
            .iter()
            .zip(&series.labels)
            .zip(&series.highlight)
            .enumerate()
            .map(|(i, ((&value, label), &highlighted))| {
                let color = Self::bar_color(highlighted);
                Bar::new(i as f64, value)
                    .name(label)
                    .width(0.7)
                    .fill(color.gamma_multiply(0.8))
                    .stroke(egui::Stroke::new(1.0, color))
            })
            .collect();

        let x_labels = series.labels.clone();
        let y_max = series.max_value() * 1.1;

        Plot::new(format!("bar_{}", series.id))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_grid([false, true])
            .include_y(0.0)
            .include_y(y_max)
            .y_axis_label("Ratio")
            // Only integer positions carry a label
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                x_labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .y_axis_formatter(|mark, _range| format_percent(mark.value, 0))
            .label_formatter(|name, value| {
                if name.is_empty() {
                    String::new()
                } else {
                    format!("{}\n{}", name, format_percent(value.y, 1))
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(&series.title));
            });
    }

    /// Draw the detailed ranking table
    pub fn draw_ranked_table(ui: &mut egui::Ui, metric: &RankedMetric) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id("ranked_table"))
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        // Headers
                        ui.label(RichText::new("Rank").strong().size(11.0));
                        ui.label(RichText::new("Country").strong().size(11.0));
                        ui.label(
                            RichText::new(format!("{} (A+T)", metric.pair.base_label()))
                                .strong()
                                .size(11.0),
                        );
                        ui.label(RichText::new("Label").strong().size(11.0));
                        ui.end_row();

                        let default_text_color = ui.visuals().text_color();

                        for entry in &metric.entries {
                            let text_color = if entry.label == RankLabel::SelectedCountry {
                                HIGHLIGHT_COLOR
                            } else {
                                default_text_color
                            };

                            ui.label(RichText::new(entry.rank.to_string()).size(11.0));
                            ui.label(RichText::new(&entry.country).size(11.0).color(text_color));
                            ui.label(
                                RichText::new(format_percent(entry.combined, 2)).size(11.0),
                            );
                            ui.label(
                                RichText::new(entry.label.to_string())
                                    .size(11.0)
                                    .color(text_color),
                            );
                            ui.end_row();
                        }
                    });
            });
    }
}
