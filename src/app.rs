// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the labeling engine and translates UI
//! actions into engine calls; all session state lives in the engine.

use crate::config::Settings;
use crate::engine::{LabelingEngine, RestoreOutcome};
use crate::io::media;
use crate::ui::{canvas, config_panel, label_panel, timeline, toolbar};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};

/// Status line message.
enum Notice {
    Info(String),
    Error(String),
}

/// Result of background frame decoding.
struct LoadedFrameData {
    frame: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Main application state.
pub struct LabelerApp {
    /// Session state and labeling rules
    engine: LabelingEngine,

    /// Settings the app was started with
    settings: Settings,

    /// Texture of the displayed frame
    frame_texture: Option<egui::TextureHandle>,

    /// Displayed frame dimensions (width, height)
    frame_size: Option<(u32, u32)>,

    /// Frame key the texture (or the pending load) belongs to
    texture_frame: Option<String>,

    /// Receiver for background frame decoding
    image_loader: Option<Receiver<Result<LoadedFrameData, String>>>,

    /// Clicking a label pins it instead of toggling it
    pin_mode: bool,

    /// Label configuration being edited
    label_text: String,

    /// Export frames without labels too
    include_unlabeled: bool,

    /// Reset confirmation dialog is open
    confirm_reset: bool,

    /// Last message for the status line
    notice: Option<Notice>,
}

impl LabelerApp {
    /// Create the application around an already restored engine.
    pub fn new(engine: LabelingEngine, settings: Settings, restore: RestoreOutcome) -> Self {
        let notice = match restore {
            RestoreOutcome::Restored { frames } => Some(Notice::Info(format!(
                "Restored previous session ({frames} frames)"
            ))),
            RestoreOutcome::Discarded { reason } => Some(Notice::Error(format!(
                "Previous session could not be read and was discarded: {reason}"
            ))),
            RestoreOutcome::Missing => None,
        };

        Self {
            label_text: engine.config().to_text(),
            include_unlabeled: settings.include_unlabeled,
            engine,
            settings,
            frame_texture: None,
            frame_size: None,
            texture_frame: None,
            image_loader: None,
            pin_mode: false,
            confirm_reset: false,
            notice,
        }
    }

    fn info(&mut self, message: String) {
        log::info!("{}", message);
        self.notice = Some(Notice::Info(message));
    }

    fn error(&mut self, message: String) {
        log::error!("{}", message);
        self.notice = Some(Notice::Error(message));
    }

    /// Pick a folder and start labeling its frames.
    fn open_folder(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_directory(&self.settings.data_root)
            .pick_folder()
        else {
            return;
        };

        match self.engine.load_frames(&path) {
            Ok(0) => self.error(format!("No image files found in {}", path.display())),
            Ok(count) => self.info(format!("Loaded {} frames from {}", count, path.display())),
            Err(e) => self.error(format!("Failed to read {}: {}", path.display(), e)),
        }
        self.clear_texture();
    }

    /// Load the label configuration from a text file.
    fn load_label_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Label lists", &["txt"])
            .pick_file()
        else {
            return;
        };

        match self.engine.load_label_file(&path) {
            Ok(()) => {
                self.label_text = self.engine.config().to_text();
                self.info(format!(
                    "Loaded {} labels from {}",
                    self.engine.config().label_count(),
                    path.display()
                ));
            }
            Err(e) => self.error(format!("Failed to load labels: {}", e)),
        }
    }

    fn apply_label_text(&mut self) {
        match self.engine.apply_label_text(&self.label_text) {
            Ok(()) => {
                self.label_text = self.engine.config().to_text();
                self.info(format!(
                    "Label configuration updated ({} labels)",
                    self.engine.config().label_count()
                ));
            }
            Err(e) => self.error(format!("Label configuration rejected: {}", e)),
        }
    }

    fn export_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(self.settings.export_file_name.as_str())
            .save_file()
        else {
            return;
        };

        match self.engine.export_csv_to(&path, self.include_unlabeled) {
            Ok(()) => self.info(format!("Exported labels to {}", path.display())),
            Err(e) => self.error(format!("Failed to export labels: {}", e)),
        }
    }

    fn import_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
        else {
            return;
        };

        match self.engine.import_csv_file(&path) {
            Ok(report) => {
                self.label_text = self.engine.config().to_text();
                self.info(format!(
                    "Imported {} labels for {} frames ({} rows without a matching frame)",
                    report.labels_adopted, report.frames_updated, report.skipped_rows
                ));
            }
            Err(e) => self.error(format!("Import rejected: {}", e)),
        }
    }

    fn reset_session(&mut self) {
        self.engine.reset();
        self.label_text = self.engine.config().to_text();
        self.pin_mode = false;
        self.clear_texture();
        self.info("Session reset".to_string());
    }

    fn clear_texture(&mut self) {
        self.frame_texture = None;
        self.frame_size = None;
        self.texture_frame = None;
        self.image_loader = None;
    }

    /// Start decoding the current frame if it is not the one on screen.
    fn request_current_frame(&mut self) {
        let Some(frame) = self.engine.current_frame() else {
            return;
        };
        if self.texture_frame.as_deref() == Some(frame) {
            return;
        }

        let frame = frame.to_string();
        self.texture_frame = Some(frame.clone());

        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);

        // Spawn background thread for decoding
        std::thread::spawn(move || {
            let result = media::load_image(&PathBuf::from(&frame))
                .map(|img| LoadedFrameData {
                    frame,
                    width: img.width,
                    height: img.height,
                    pixels: img.pixels,
                })
                .map_err(|e| format!("{:#}", e));

            let _ = sender.send(result);
        });
    }

    /// Turn a finished decode into a texture.
    fn poll_frame_loader(&mut self, ctx: &egui::Context) {
        let Some(ref receiver) = self.image_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.image_loader = None;

        match result {
            Ok(loaded) if self.texture_frame.as_deref() == Some(loaded.frame.as_str()) => {
                let size = [loaded.width as usize, loaded.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                let texture =
                    ctx.load_texture("current_frame", color_image, egui::TextureOptions::LINEAR);

                self.frame_texture = Some(texture);
                self.frame_size = Some((loaded.width, loaded.height));
            }
            Ok(stale) => log::debug!("Dropping stale decode of {}", stale.frame),
            Err(e) => self.error(format!("Failed to load frame: {}", e)),
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
            self.engine.previous();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
            self.engine.next();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.engine.toggle_playback();
        }
    }

    fn show_reset_dialog(&mut self, ctx: &egui::Context) {
        if !self.confirm_reset {
            return;
        }
        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Reset session?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("This deletes the saved session and all labels. It cannot be undone.");
                ui.horizontal(|ui| {
                    confirmed = ui.button("Reset").clicked();
                    cancelled = ui.button("Cancel").clicked();
                });
            });

        if confirmed {
            self.reset_session();
        }
        if confirmed || cancelled {
            self.confirm_reset = false;
        }
    }
}

impl eframe::App for LabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Advance playback before drawing so the new frame is shown
        if self.engine.is_playing() {
            self.engine.tick();
            ctx.request_repaint();
        }

        self.request_current_frame();
        self.poll_frame_loader(ctx);
        if self.image_loader.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Folder...").clicked() {
                        self.open_folder();
                        ui.close_menu();
                    }
                    if ui.button("Load Label File...").clicked() {
                        self.load_label_file();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Import CSV...").clicked() {
                        self.import_csv();
                        ui.close_menu();
                    }
                    if ui.button("Export CSV...").clicked() {
                        self.export_csv();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Reset Session...").clicked() {
                        self.confirm_reset = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Status line
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.notice {
                    Some(Notice::Info(message)) => {
                        ui.label(message.as_str());
                    }
                    Some(Notice::Error(message)) => {
                        ui.colored_label(egui::Color32::LIGHT_RED, message.as_str());
                    }
                    None => {
                        ui.label("Ready");
                    }
                }
                if let Some(err) = self.engine.last_persist_error() {
                    ui.separator();
                    ui.colored_label(egui::Color32::YELLOW, format!("Session not saved: {err}"));
                }
            });
        });

        // Transport and scrubber
        let (transport_action, seek) = egui::TopBottomPanel::bottom("transport")
            .show(ctx, |ui| {
                ui.add_space(4.0);
                let seek =
                    timeline::show(ui, self.engine.current_index(), self.engine.frame_count());
                let action = toolbar::show(
                    ui,
                    self.engine.is_playing(),
                    self.engine.play_speed(),
                    self.engine.actual_fps(),
                );
                ui.add_space(4.0);
                (action, seek)
            })
            .inner;

        match transport_action {
            toolbar::TransportAction::Previous => self.engine.previous(),
            toolbar::TransportAction::Next => self.engine.next(),
            toolbar::TransportAction::TogglePlay => self.engine.toggle_playback(),
            toolbar::TransportAction::SetSpeed(fps) => self.engine.set_play_speed(fps),
            toolbar::TransportAction::None => {}
        }
        if let Some(index) = seek {
            self.engine.go_to(index as i64);
        }

        // Configuration panel (left side)
        let dirty = self.label_text.trim() != self.engine.config().to_text();
        let config_action = egui::SidePanel::left("configuration")
            .default_width(260.0)
            .show(ctx, |ui| {
                if let Some(path) = self.engine.selected_path() {
                    ui.label(egui::RichText::new(path.display().to_string()).monospace().weak());
                    ui.separator();
                }
                config_panel::show(ui, &mut self.label_text, dirty, &mut self.include_unlabeled)
            })
            .inner;

        match config_action {
            config_panel::ConfigAction::Apply => self.apply_label_text(),
            config_panel::ConfigAction::Revert => self.label_text = self.engine.config().to_text(),
            config_panel::ConfigAction::None => {}
        }

        // Label panel (right side)
        let active = self.engine.current_labels();
        let has_frame = self.engine.current_frame().is_some();
        let label_action = egui::SidePanel::right("labels")
            .default_width(220.0)
            .show(ctx, |ui| {
                label_panel::show(
                    ui,
                    self.engine.config(),
                    &active,
                    self.engine.pins(),
                    &mut self.pin_mode,
                    has_frame,
                )
            })
            .inner;

        match label_action {
            label_panel::LabelAction::Toggle(label) => self.engine.toggle_active(&label),
            label_panel::LabelAction::TogglePin(label) => {
                self.engine.toggle_pin(&label);
            }
            label_panel::LabelAction::None => {}
        }

        self.handle_keyboard(ctx);

        // Main canvas (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            let view = canvas::FrameView {
                texture: self.frame_texture.as_ref(),
                image_size: self.frame_size,
                file_name: self.engine.current_frame().map(media::frame_file_name),
                index: self.engine.current_index(),
                total: self.engine.frame_count(),
            };
            canvas::show(ui, &view);
        });

        self.show_reset_dialog(ctx);
    }
}
