// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame display area.
//!
//! Shows the current frame scaled to fit, with its file name and position
//! in the sequence, or a welcome message when no folder is loaded.

/// What the canvas needs to draw the current frame.
pub struct FrameView<'a> {
    pub texture: Option<&'a egui::TextureHandle>,
    pub image_size: Option<(u32, u32)>,
    pub file_name: Option<String>,
    pub index: usize,
    pub total: usize,
}

/// Display the main canvas area.
pub fn show(ui: &mut egui::Ui, view: &FrameView<'_>) {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    if view.total == 0 {
        show_welcome(ui);
        return;
    }

    ui.horizontal(|ui| {
        ui.heading(format!("Frame {} / {}", view.index + 1, view.total));
        if let Some(name) = &view.file_name {
            ui.separator();
            ui.label(egui::RichText::new(name).monospace());
        }
    });
    ui.separator();

    let available_size = ui.available_size();
    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        match (view.texture, view.image_size) {
            (Some(texture), Some((img_width, img_height))) => {
                let available = ui.available_size();
                let (display_width, display_height) = crate::util::geometry::fit_within(
                    img_width,
                    img_height,
                    (available.x, available.y),
                );
                let (x_offset, y_offset) = crate::util::geometry::center_offset(
                    (display_width, display_height),
                    (available.x, available.y),
                );

                let image_rect = egui::Rect::from_min_size(
                    ui.min_rect().min + egui::vec2(x_offset, y_offset),
                    egui::vec2(display_width, display_height),
                );

                ui.painter().image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            _ => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
        }
    });
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Frame Labeler")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Label image sequences and export them as CSV")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open a folder of frames to begin labeling")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Folder...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}
