// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label configuration editor.
//!
//! One label per line; `## name` starts a single-choice group. Edits only
//! take effect when applied.

/// Result of configuration panel interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    None,
    Apply,
    Revert,
}

/// Display the configuration editor.
pub fn show(
    ui: &mut egui::Ui,
    text: &mut String,
    dirty: bool,
    include_unlabeled: &mut bool,
) -> ConfigAction {
    let mut action = ConfigAction::None;

    ui.heading("Label configuration");
    ui.label(
        egui::RichText::new(
            "One label per line. A line starting with ## opens a single-choice group.",
        )
        .weak(),
    );

    egui::ScrollArea::vertical()
        .max_height(300.0)
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(text)
                    .code_editor()
                    .desired_rows(10)
                    .desired_width(f32::INFINITY),
            );
        });

    ui.horizontal(|ui| {
        if ui.add_enabled(dirty, egui::Button::new("Apply")).clicked() {
            action = ConfigAction::Apply;
        }
        if ui.add_enabled(dirty, egui::Button::new("Revert")).clicked() {
            action = ConfigAction::Revert;
        }
    });

    ui.separator();
    ui.heading("Export");
    ui.checkbox(include_unlabeled, "Include frames without labels");

    action
}
