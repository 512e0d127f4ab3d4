// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame Labeler
//!
//! A cross-platform desktop application for assigning labels to image
//! sequences and exporting them as a CSV dataset.

use anyhow::{Context, Result};
use framelabel::app::LabelerApp;
use framelabel::config::Settings;
use framelabel::io::snapshot::SnapshotStore;
use framelabel::{LabelingEngine, SessionDefaults};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::discover().context("Failed to read settings")?;

    // Pick up where the last session left off
    let mut engine = LabelingEngine::new(
        SessionDefaults::from_settings(&settings),
        Some(SnapshotStore::new(&settings.snapshot_path)),
    );
    let restore = engine.restore();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Frame Labeler"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Frame Labeler",
        options,
        Box::new(move |_cc| Ok(Box::new(LabelerApp::new(engine, settings, restore)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
