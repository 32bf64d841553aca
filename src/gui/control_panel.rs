//! Control Panel Widget
//! Left side panel with data source, country selection and export controls.

use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Left side control panel.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub countries: Vec<String>,
    pub selected_country: Option<String>,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            countries: Vec::new(),
            selected_country: None,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update selectable countries after a load.
    pub fn update_countries(&mut self, countries: Vec<String>, selected: Option<String>) {
        self.export_enabled = !countries.is_empty();
        self.countries = countries;
        self.selected_country = selected;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌏 Personality Atlas")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("MBTI by country, 32 types")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Country Section =====
        ui.label(RichText::new("🔧 Options").size(14.0).strong());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.add_sized([80.0, 20.0], egui::Label::new("Country:"));
            let selected_text = self.selected_country.clone().unwrap_or_default();
            ui.add_enabled_ui(!self.countries.is_empty(), |ui| {
                ComboBox::from_id_salt("country")
                    .width(180.0)
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        for country in &self.countries {
                            let is_selected =
                                self.selected_country.as_deref() == Some(country.as_str());
                            if ui.selectable_label(is_selected, country).clicked() && !is_selected {
                                self.selected_country = Some(country.clone());
                                action = ControlPanelAction::CountryChanged;
                            }
                        }
                    });
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") || self.status.contains("unavailable") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    CountryChanged,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_is_enabled_only_with_countries() {
        let mut panel = ControlPanel::new();
        assert!(!panel.export_enabled);

        panel.update_countries(vec!["Japan".into()], Some("Japan".into()));
        assert!(panel.export_enabled);
        assert_eq!(panel.selected_country.as_deref(), Some("Japan"));

        panel.update_countries(Vec::new(), None);
        assert!(!panel.export_enabled);
        assert!(panel.selected_country.is_none());
    }
}
