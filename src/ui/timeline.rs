// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame sequence scrubber.
//!
//! A slider for jumping to any frame and a progress bar showing how far
//! through the sequence the cursor is.

/// Display the scrubber. Returns the frame index the operator dragged to.
pub fn show(ui: &mut egui::Ui, index: usize, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }

    let mut target = index;
    let mut moved = false;
    ui.horizontal(|ui| {
        let slider = egui::Slider::new(&mut target, 0..=total - 1)
            .show_value(false)
            .clamp_to_range(true);
        moved = ui.add(slider).changed();
        ui.label(format!("{} / {}", index + 1, total));
    });

    let progress = (index + 1) as f32 / total as f32;
    ui.add(egui::ProgressBar::new(progress).show_percentage());

    (moved && target != index).then_some(target)
}
