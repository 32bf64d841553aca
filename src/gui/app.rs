//! Personality Atlas Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{StaticChartRenderer, EXPORT_SIZE};
use crate::config::DashboardConfig;
use crate::dashboard::{resolve_country, DashboardReport};
use crate::data::DataLoader;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::Path;
use tracing::{info, warn};

/// Main application window.
///
/// Owns the loaded table for the whole session; every interaction recomputes
/// the report from it.
pub struct AtlasApp {
    config: DashboardConfig,
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl AtlasApp {
    /// Create the window around an already attempted load.
    ///
    /// `load_error` is shown in place of the charts when loading failed.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        loader: DataLoader,
        load_error: Option<String>,
        initial_country: Option<String>,
    ) -> Self {
        let mut app = Self {
            config,
            loader,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.control_panel.csv_path = app.loader.file_path().cloned();
        app.refresh_after_load(load_error, initial_country);
        app
    }

    /// Reset country list and report after a load attempt.
    fn refresh_after_load(&mut self, load_error: Option<String>, initial_country: Option<String>) {
        let table = self.loader.table();

        if let Some(error) = load_error {
            self.control_panel.update_countries(Vec::new(), None);
            self.control_panel.set_status(&format!("Error: {}", error));
            self.chart_viewer
                .set_report(DashboardReport::unavailable(format!("Data unavailable: {}", error)));
            return;
        }

        let selected = resolve_country(
            table,
            initial_country.as_deref(),
            &self.config.preferred_country,
        );
        self.control_panel
            .update_countries(table.countries().to_vec(), selected);
        self.control_panel.set_status(&format!(
            "Loaded {} countries, {} types",
            table.row_count(),
            table.categories().len()
        ));
        self.recompute();
    }

    /// Rebuild every view for the current selection.
    fn recompute(&mut self) {
        let report = DashboardReport::build(
            self.loader.table(),
            self.control_panel.selected_country.as_deref(),
            &self.config,
        );
        self.chart_viewer.set_report(report);
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        self.control_panel.csv_path = Some(path.clone());
        let load_error = self.loader.load_csv(&path).err().map(|e| e.to_string());
        let previous = self.control_panel.selected_country.clone();
        self.refresh_after_load(load_error, previous);
    }

    /// Handle PNG export of the current views
    fn handle_export_png(&mut self) {
        let Some(report) = self.chart_viewer.report() else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        match StaticChartRenderer::export_report(report, &dir, EXPORT_SIZE) {
            Ok(paths) => {
                self.control_panel
                    .set_status(&format!("Exported {} charts", paths.len()));
                Self::open_folder(&dir);
            }
            Err(e) => {
                warn!(error = %e, "chart export failed");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn open_folder(dir: &Path) {
        if let Err(e) = open::that(dir) {
            warn!(error = %e, path = %dir.display(), "could not open export folder");
        }
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(330.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::CountryChanged => {
                            info!(
                                country = ?self.control_panel.selected_country,
                                "selection changed"
                            );
                            self.recompute();
                        }
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
