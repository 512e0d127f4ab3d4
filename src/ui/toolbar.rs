// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback transport controls.
//!
//! Previous / play-pause / next buttons, the target speed slider and the
//! measured frame rate.

use crate::models::playback::{MAX_PLAY_SPEED, MIN_PLAY_SPEED};

/// Result of transport interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportAction {
    None,
    Previous,
    TogglePlay,
    Next,
    SetSpeed(f64),
}

/// Display the transport controls.
pub fn show(
    ui: &mut egui::Ui,
    is_playing: bool,
    play_speed: f64,
    actual_fps: f64,
) -> TransportAction {
    let mut action = TransportAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("⏮ Previous").clicked() {
            action = TransportAction::Previous;
        }

        let play_label = if is_playing { "⏸ Pause" } else { "▶ Play" };
        if ui.button(play_label).clicked() {
            action = TransportAction::TogglePlay;
        }

        if ui.button("Next ⏭").clicked() {
            action = TransportAction::Next;
        }

        ui.separator();

        let mut speed = play_speed;
        let slider = egui::Slider::new(&mut speed, MIN_PLAY_SPEED..=MAX_PLAY_SPEED)
            .text("fps")
            .step_by(1.0);
        if ui.add(slider).changed() {
            action = TransportAction::SetSpeed(speed);
        }

        if is_playing {
            ui.separator();
            ui.label(egui::RichText::new(format!("{:.1} fps actual", actual_fps)).italics().weak());
        }
    });

    action
}
