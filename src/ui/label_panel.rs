// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label buttons for the current frame.
//!
//! Checkbox labels are listed first, then each radio group under its name.
//! Active labels are highlighted and pinned labels carry a pin marker. With
//! pin mode on, a click pins or unpins the label instead of toggling it.

use crate::models::{FixedLabels, LabelConfig, LabelSet};

/// Result of label panel interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelAction {
    None,
    Toggle(String),
    TogglePin(String),
}

/// Display the label panel.
pub fn show(
    ui: &mut egui::Ui,
    config: &LabelConfig,
    active: &LabelSet,
    pins: &FixedLabels,
    pin_mode: &mut bool,
    enabled: bool,
) -> LabelAction {
    let mut action = LabelAction::None;

    ui.heading("Labels");
    ui.toggle_value(pin_mode, "📌 Pin mode").on_hover_text(
        "While on, clicking a label pins it to every frame you visit. Click again to unpin.",
    );
    ui.separator();

    if config.label_count() == 0 {
        ui.label(egui::RichText::new("No labels configured").italics().weak());
        return action;
    }

    ui.add_enabled_ui(enabled, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            for label in config.checkbox_labels() {
                if label_button(ui, label, active, pins) {
                    action = click(label, *pin_mode);
                }
            }

            for group in config.radio_groups() {
                ui.add_space(8.0);
                ui.label(egui::RichText::new(&group.name).strong());
                for option in &group.options {
                    if label_button(ui, option, active, pins) {
                        action = click(option, *pin_mode);
                    }
                }
            }
        });
    });

    action
}

fn click(label: &str, pin_mode: bool) -> LabelAction {
    if pin_mode {
        LabelAction::TogglePin(label.to_string())
    } else {
        LabelAction::Toggle(label.to_string())
    }
}

fn label_button(ui: &mut egui::Ui, label: &str, active: &LabelSet, pins: &FixedLabels) -> bool {
    let text = if pins.contains(label) {
        format!("📌 {label}")
    } else {
        label.to_string()
    };
    let button = egui::Button::new(text)
        .selected(active.contains(label))
        .min_size(egui::vec2(ui.available_width(), 0.0));
    ui.add(button).clicked()
}
