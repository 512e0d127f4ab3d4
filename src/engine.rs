// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The labeling session engine.
//!
//! [`LabelingEngine`] owns the frame sequence, label configuration, label
//! store, pinned labels and playback state. Every method that changes any of
//! them writes a snapshot before returning, so an interrupted session can be
//! picked up again with [`LabelingEngine::restore`].

use crate::config::Settings;
use crate::error::{EngineError, EngineResult};
use crate::io::csv_codec::{self, ImportReport};
use crate::io::media;
use crate::io::snapshot::{SessionSnapshot, SnapshotStore};
use crate::models::{
    Clock, FixedLabels, LabelConfig, LabelSet, LabelStore, Playback, SystemClock, TickOutcome,
};
use std::path::{Path, PathBuf};

/// Values a fresh session starts from.
#[derive(Debug, Clone)]
pub struct SessionDefaults {
    pub play_speed: f64,
    pub label_lines: Vec<String>,
}

impl SessionDefaults {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            play_speed: settings.default_play_speed,
            label_lines: settings.default_labels.clone(),
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// What happened when looking for a previous session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No snapshot store or no snapshot file.
    Missing,
    /// The previous session was restored.
    Restored { frames: usize },
    /// The snapshot was unusable and has been deleted.
    Discarded { reason: String },
}

/// Owner of all labeling session state.
pub struct LabelingEngine {
    defaults: SessionDefaults,
    selected_path: Option<PathBuf>,
    frames: Vec<String>,
    config: LabelConfig,
    labels: LabelStore,
    pins: FixedLabels,
    playback: Playback,
    snapshots: Option<SnapshotStore>,
    clock: Box<dyn Clock>,
    last_persist_error: Option<String>,
}

impl LabelingEngine {
    /// Create an engine using the system clock.
    pub fn new(defaults: SessionDefaults, snapshots: Option<SnapshotStore>) -> Self {
        Self::with_clock(defaults, snapshots, Box::new(SystemClock))
    }

    /// Create an engine with an explicit clock.
    pub fn with_clock(
        defaults: SessionDefaults,
        snapshots: Option<SnapshotStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let config = default_config(&defaults);
        let playback = Playback::new(defaults.play_speed);
        Self {
            defaults,
            selected_path: None,
            frames: Vec::new(),
            config,
            labels: LabelStore::new(),
            pins: FixedLabels::new(),
            playback,
            snapshots,
            clock,
            last_persist_error: None,
        }
    }

    // --- Accessors ---

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selected_path.as_deref()
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn labels(&self) -> &LabelStore {
        &self.labels
    }

    pub fn pins(&self) -> &FixedLabels {
        &self.pins
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn current_index(&self) -> usize {
        self.playback.current_frame_index
    }

    /// Key of the frame under the cursor, if any frames are loaded.
    pub fn current_frame(&self) -> Option<&str> {
        self.frames
            .get(self.playback.current_frame_index)
            .map(String::as_str)
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing
    }

    pub fn play_speed(&self) -> f64 {
        self.playback.play_speed
    }

    pub fn actual_fps(&self) -> f64 {
        self.playback.actual_fps
    }

    /// Active labels of `frame`, empty if it has none.
    pub fn active_labels(&self, frame: &str) -> LabelSet {
        self.labels.get_active(frame)
    }

    pub fn current_labels(&self) -> LabelSet {
        self.current_frame()
            .map(|frame| self.labels.get_active(frame))
            .unwrap_or_default()
    }

    /// Message of the most recent failed snapshot write, cleared by the
    /// next successful one.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    // --- Persistence ---

    /// Capture the whole session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(
            self.selected_path.clone(),
            self.frames.clone(),
            self.config.raw_lines().to_vec(),
            self.labels.clone(),
            self.pins.clone(),
            self.playback.clone(),
        )
    }

    fn persist(&mut self) {
        let Some(store) = &self.snapshots else {
            return;
        };
        match store.save(&self.snapshot()) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                log::error!("Failed to save session snapshot: {}", e);
                self.last_persist_error = Some(e.to_string());
            }
        }
    }

    /// Load the previous session from the snapshot store.
    ///
    /// An unreadable or inconsistent snapshot is deleted and the engine
    /// keeps its defaults.
    pub fn restore(&mut self) -> RestoreOutcome {
        let Some(store) = self.snapshots.clone() else {
            return RestoreOutcome::Missing;
        };

        let result = store.load().and_then(|snapshot| match snapshot {
            Some(snapshot) => self.apply_snapshot(snapshot).map(Some),
            None => Ok(None),
        });

        match result {
            Ok(Some(frames)) => {
                log::info!("Restored previous session with {} frames", frames);
                RestoreOutcome::Restored { frames }
            }
            Ok(None) => RestoreOutcome::Missing,
            Err(e) => {
                log::warn!("Discarding unusable session snapshot: {}", e);
                if let Err(discard_err) = store.discard() {
                    log::error!("Failed to delete session snapshot: {}", discard_err);
                }
                RestoreOutcome::Discarded {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: SessionSnapshot) -> EngineResult<usize> {
        let config = LabelConfig::parse(&snapshot.label_config).map_err(|e| {
            EngineError::InvalidSnapshot {
                reason: format!("stored label configuration: {e}"),
            }
        })?;
        if !snapshot.playback.play_speed.is_finite() || snapshot.playback.play_speed <= 0.0 {
            return Err(EngineError::InvalidSnapshot {
                reason: format!("play speed {}", snapshot.playback.play_speed),
            });
        }

        let mut playback = snapshot.playback;
        if playback.ensure_in_range(snapshot.frames.len()) {
            log::warn!("Restored frame index was out of range, reset to 0");
        }
        // A restored session always starts paused
        playback.pause();

        let mut labels = snapshot.labels;
        let regrouped = labels.enforce_groups(&config);
        if regrouped > 0 {
            log::warn!("Restored labels broke radio groups on {} frames", regrouped);
        }

        self.selected_path = snapshot.selected_path;
        self.frames = snapshot.frames;
        self.config = config;
        self.labels = labels;
        self.pins = snapshot.fixed_labels;
        self.playback = playback;
        Ok(self.frames.len())
    }

    /// Drop the snapshot and return every field to its default.
    pub fn reset(&mut self) {
        if let Some(store) = &self.snapshots {
            if let Err(e) = store.discard() {
                log::error!("Failed to delete session snapshot: {}", e);
            }
        }
        self.selected_path = None;
        self.frames.clear();
        self.config = default_config(&self.defaults);
        self.labels.clear();
        self.pins.clear();
        self.playback = Playback::new(self.defaults.play_speed);
        self.last_persist_error = None;
        log::info!("Session reset");
    }

    // --- Frames ---

    /// Start a labeling session on the images under `root`.
    ///
    /// Returns the number of frames found.
    pub fn load_frames(&mut self, root: &Path) -> EngineResult<usize> {
        let frames = media::discover_frames(root)?;
        self.set_frames(Some(root.to_path_buf()), frames);
        Ok(self.frames.len())
    }

    /// Replace the frame sequence.
    ///
    /// The cursor goes back to the first frame and all label assignments are
    /// cleared. The label configuration, pins and play speed are kept.
    pub fn set_frames(&mut self, selected_path: Option<PathBuf>, mut frames: Vec<String>) {
        frames.sort();
        frames.dedup();

        self.selected_path = selected_path;
        self.frames = frames;
        self.labels.clear();
        self.playback.pause();
        self.playback.current_frame_index = 0;
        log::info!("Loaded {} frames", self.frames.len());
        self.persist();
    }

    // --- Label configuration ---

    /// Replace the label configuration with `lines`.
    ///
    /// On error the previous configuration stays in place.
    pub fn apply_label_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> EngineResult<()> {
        let config = LabelConfig::parse(lines)?;
        if config.is_empty() {
            return Err(EngineError::EmptyConfiguration);
        }
        self.set_config(config);
        Ok(())
    }

    /// Replace the label configuration from multi-line text.
    pub fn apply_label_text(&mut self, text: &str) -> EngineResult<()> {
        let lines: Vec<&str> = text.lines().collect();
        self.apply_label_lines(&lines)
    }

    /// Replace the label configuration from a text file.
    pub fn load_label_file(&mut self, path: &Path) -> EngineResult<()> {
        let text = std::fs::read_to_string(path)?;
        self.apply_label_text(&text)?;
        log::info!(
            "Loaded {} labels from {}",
            self.config.label_count(),
            path.display()
        );
        Ok(())
    }

    /// Adopt `config`. Frames left with several options of one radio group
    /// keep only the option listed first.
    fn set_config(&mut self, config: LabelConfig) {
        if config == self.config {
            return;
        }
        log::info!(
            "Label configuration: {} checkbox labels, {} radio groups",
            config.checkbox_labels().len(),
            config.radio_groups().len()
        );
        let regrouped = self.labels.enforce_groups(&config);
        if regrouped > 0 {
            log::info!("Dropped extra radio options on {} frames", regrouped);
        }
        self.config = config;
        self.persist();
    }

    // --- Labels ---

    /// Activate or deactivate `label` on `frame`.
    ///
    /// Unknown frames are ignored.
    pub fn set_active(&mut self, frame: &str, label: &str, active: bool) {
        if !self.frames.iter().any(|f| f == frame) {
            log::debug!("Ignoring label change on unknown frame {}", frame);
            return;
        }
        if self.labels.set_active(frame, label, active, &self.config) {
            log::debug!("{} {} on {}", if active { "Set" } else { "Cleared" }, label, frame);
            self.persist();
        }
    }

    /// Flip `label` on the current frame.
    pub fn toggle_active(&mut self, label: &str) {
        let Some(frame) = self.current_frame().map(str::to_string) else {
            return;
        };
        let active = !self.labels.is_active(&frame, label);
        self.set_active(&frame, label, active);
    }

    /// Pin or unpin `label`. Returns `true` if it is pinned afterwards.
    pub fn toggle_pin(&mut self, label: &str) -> bool {
        let pinned = self.pins.toggle(label);
        log::debug!("{} {}", if pinned { "Pinned" } else { "Unpinned" }, label);
        self.persist();
        pinned
    }

    fn apply_pins_to_current(&mut self) {
        if let Some(frame) = self.frames.get(self.playback.current_frame_index) {
            self.pins.apply(frame, &mut self.labels, &self.config);
        }
    }

    // --- Navigation and playback ---

    /// Jump to `index`, clamped to the frame range. Always stops playback.
    pub fn go_to(&mut self, index: i64) {
        if self.frames.is_empty() {
            return;
        }
        if self.playback.go_to(index, self.frames.len()).is_some() {
            self.apply_pins_to_current();
        }
        self.persist();
    }

    pub fn next(&mut self) {
        self.go_to(self.playback.current_frame_index as i64 + 1);
    }

    pub fn previous(&mut self) {
        self.go_to(self.playback.current_frame_index as i64 - 1);
    }

    pub fn play(&mut self) {
        if self.frames.is_empty() || self.playback.is_playing {
            return;
        }
        self.playback.start(self.clock.now());
        self.persist();
    }

    pub fn pause(&mut self) {
        if !self.playback.is_playing {
            return;
        }
        self.playback.pause();
        self.persist();
    }

    pub fn toggle_playback(&mut self) {
        if self.playback.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance playback by one frame.
    ///
    /// Blocks for one frame interval before moving. At the last frame
    /// playback stops instead.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.playback.is_playing {
            return TickOutcome::Idle;
        }
        if !self.playback.can_advance(self.frames.len()) {
            self.playback.pause();
            log::info!("Playback reached the last frame");
            self.persist();
            return TickOutcome::Finished;
        }

        self.clock.sleep(self.playback.frame_interval());
        let index = self.playback.advance(self.clock.now());
        self.apply_pins_to_current();
        self.persist();
        TickOutcome::Advanced(index)
    }

    /// Set the target playback rate (clamped to the supported range).
    pub fn set_play_speed(&mut self, fps: f64) {
        if self.playback.set_speed(fps) {
            self.persist();
        }
    }

    // --- CSV ---

    /// Export the label matrix as CSV bytes.
    pub fn export_csv(&self, include_unlabeled: bool) -> EngineResult<Vec<u8>> {
        csv_codec::export(
            &self.frames,
            &self.labels,
            &self.config.all_labels(),
            include_unlabeled,
        )
    }

    /// Export the label matrix to a CSV file.
    pub fn export_csv_to(&self, path: &Path, include_unlabeled: bool) -> EngineResult<()> {
        let bytes = self.export_csv(include_unlabeled)?;
        std::fs::write(path, bytes)?;
        log::info!("Exported labels to {}", path.display());
        Ok(())
    }

    /// Import a label table.
    ///
    /// The header becomes the new flat label configuration and matched
    /// frames have their labels replaced. On error nothing changes.
    pub fn import_csv(&mut self, data: &[u8]) -> EngineResult<ImportReport> {
        let imported = csv_codec::import(data, &self.frames)?;

        let report = ImportReport {
            labels_adopted: imported.config.label_count(),
            frames_updated: imported.assignments.len(),
            skipped_rows: imported.skipped_rows,
        };
        self.config = imported.config;
        for (frame, labels) in imported.assignments {
            self.labels.replace(&frame, labels);
        }
        log::info!(
            "Imported {} labels for {} frames ({} rows skipped)",
            report.labels_adopted,
            report.frames_updated,
            report.skipped_rows
        );
        self.persist();
        Ok(report)
    }

    /// Import a label table from a CSV file.
    pub fn import_csv_file(&mut self, path: &Path) -> EngineResult<ImportReport> {
        let data = std::fs::read(path)?;
        self.import_csv(&data)
    }
}

fn default_config(defaults: &SessionDefaults) -> LabelConfig {
    LabelConfig::parse(&defaults.label_lines).unwrap_or_else(|e| {
        log::warn!("Default labels are invalid ({}), starting with none", e);
        LabelConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::playback::testing::ManualClock;
    use std::time::Duration;

    fn frame_keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("/data/seq/frame_{i:03}.png")).collect()
    }

    fn engine_with(clock: &ManualClock, n: usize) -> LabelingEngine {
        let mut engine =
            LabelingEngine::with_clock(SessionDefaults::default(), None, Box::new(clock.clone()));
        engine.set_frames(Some(PathBuf::from("/data/seq")), frame_keys(n));
        engine
            .apply_label_lines(&["walk", "## weather", "sunny", "cloudy"])
            .unwrap();
        engine
    }

    fn engine(n: usize) -> LabelingEngine {
        engine_with(&ManualClock::new(), n)
    }

    #[test]
    fn test_defaults() {
        let engine = LabelingEngine::new(SessionDefaults::default(), None);
        assert_eq!(engine.config().checkbox_labels().len(), 3);
        assert_eq!(engine.play_speed(), 10.0);
        assert!(engine.current_frame().is_none());
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_radio_toggle_leaves_last_option() {
        let mut engine = engine(3);
        let frame = engine.frames()[0].clone();

        engine.set_active(&frame, "sunny", true);
        engine.set_active(&frame, "cloudy", true);

        let active = engine.active_labels(&frame);
        assert!(active.contains("cloudy"));
        assert!(!active.contains("sunny"));
    }

    #[test]
    fn test_toggle_active_on_current_frame() {
        let mut engine = engine(3);

        engine.toggle_active("walk");
        assert!(engine.current_labels().contains("walk"));
        engine.toggle_active("walk");
        assert!(engine.current_labels().is_empty());
    }

    #[test]
    fn test_unknown_frame_is_ignored() {
        let mut engine = engine(3);
        engine.set_active("/elsewhere/x.png", "walk", true);
        assert!(engine.labels().is_empty());
    }

    #[test]
    fn test_pin_applies_only_to_visited_frame() {
        let mut engine = engine(5);
        engine.toggle_pin("walk");

        engine.go_to(3);

        let frames = engine.frames().to_vec();
        assert!(engine.active_labels(&frames[3]).contains("walk"));
        assert!(engine.active_labels(&frames[1]).is_empty());
        assert!(engine.active_labels(&frames[2]).is_empty());
        // Pinning does not touch the frame the operator was on
        assert!(engine.active_labels(&frames[0]).is_empty());
    }

    #[test]
    fn test_pins_apply_when_navigating_backwards() {
        let mut engine = engine(5);
        engine.go_to(4);
        engine.toggle_pin("sunny");

        engine.previous();
        assert_eq!(engine.current_index(), 3);
        assert!(engine.current_labels().contains("sunny"));
    }

    #[test]
    fn test_go_to_clamps_and_stops() {
        let mut engine = engine(5);

        for (requested, expected) in [(-1, 0), (7, 4), (2, 2), (i64::MAX, 4), (i64::MIN, 0)] {
            engine.play();
            engine.go_to(requested);
            assert_eq!(engine.current_index(), expected);
            assert!(!engine.is_playing());
        }
    }

    #[test]
    fn test_go_to_same_index_does_not_reapply_pins() {
        let mut engine = engine(3);
        engine.toggle_pin("walk");

        engine.go_to(0);
        assert!(engine.current_labels().is_empty());
    }

    #[test]
    fn test_empty_sequence_is_noop() {
        let clock = ManualClock::new();
        let mut engine = engine_with(&clock, 0);

        engine.go_to(3);
        engine.next();
        engine.toggle_active("walk");
        engine.play();

        assert_eq!(engine.current_index(), 0);
        assert!(!engine.is_playing());
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(engine.labels().is_empty());
    }

    #[test]
    fn test_tick_advances_and_applies_pins() {
        let clock = ManualClock::new();
        let mut engine = engine_with(&clock, 3);
        engine.set_play_speed(4.0);
        engine.toggle_pin("walk");

        engine.play();
        assert_eq!(engine.tick(), TickOutcome::Advanced(1));

        assert_eq!(clock.total_slept(), Duration::from_millis(250));
        assert!((engine.actual_fps() - 4.0).abs() < 1e-9);
        assert!(engine.current_labels().contains("walk"));
    }

    #[test]
    fn test_actual_fps_reflects_wall_clock() {
        let clock = ManualClock::new();
        let mut engine = engine_with(&clock, 3);
        engine.set_play_speed(10.0);

        engine.play();
        // Slow rendering between ticks lowers the measured rate
        clock.advance(Duration::from_millis(400));
        engine.tick();

        assert!((engine.actual_fps() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_playback_stops_at_last_frame() {
        let mut engine = engine(3);

        engine.play();
        assert_eq!(engine.tick(), TickOutcome::Advanced(1));
        assert_eq!(engine.tick(), TickOutcome::Advanced(2));
        assert_eq!(engine.tick(), TickOutcome::Finished);

        assert!(!engine.is_playing());
        assert_eq!(engine.current_index(), 2);
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_play_from_last_frame_finishes_immediately() {
        let clock = ManualClock::new();
        let mut engine = engine_with(&clock, 4);
        engine.go_to(3);

        engine.play();
        assert_eq!(engine.tick(), TickOutcome::Finished);
        assert_eq!(engine.current_index(), 3);
        assert!(!engine.is_playing());
        assert_eq!(clock.total_slept(), Duration::ZERO);
    }

    #[test]
    fn test_pause_then_tick_is_idle() {
        let mut engine = engine(3);

        engine.toggle_playback();
        assert!(engine.is_playing());
        engine.toggle_playback();
        assert!(!engine.is_playing());
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn test_invalid_config_keeps_previous() {
        let mut engine = engine(3);
        let before = engine.config().clone();

        assert!(matches!(
            engine.apply_label_text("walk\nrun\nwalk"),
            Err(EngineError::DuplicateLabel { .. })
        ));
        assert!(matches!(
            engine.apply_label_text("\n  \n"),
            Err(EngineError::EmptyConfiguration)
        ));
        assert_eq!(engine.config(), &before);
    }

    #[test]
    fn test_set_frames_clears_labels_keeps_config_and_pins() {
        let mut engine = engine(3);
        engine.toggle_active("walk");
        engine.toggle_pin("sunny");
        engine.go_to(2);

        engine.set_frames(None, frame_keys(2));

        assert_eq!(engine.current_index(), 0);
        assert!(engine.labels().is_empty());
        assert!(engine.pins().contains("sunny"));
        assert!(engine.config().is_checkbox("walk"));
    }

    #[test]
    fn test_import_replaces_labels_and_flattens_config() {
        let mut engine = engine(3);
        let frame = engine.frames()[1].clone();
        engine.set_active(&frame, "cloudy", true);

        let report = engine
            .import_csv(b"filename,walk,sunny\nframe_001.png,1,0\nnope.png,1,1\n")
            .unwrap();

        assert_eq!(
            report,
            ImportReport {
                labels_adopted: 2,
                frames_updated: 1,
                skipped_rows: 1
            }
        );
        let active = engine.active_labels(&frame);
        assert_eq!(active.iter().collect::<Vec<_>>(), vec!["walk"]);
        assert!(engine.config().radio_groups().is_empty());
    }

    #[test]
    fn test_failed_import_changes_nothing() {
        let mut engine = engine(3);
        let frame = engine.frames()[0].clone();
        engine.set_active(&frame, "sunny", true);
        let config = engine.config().clone();
        let labels = engine.labels().clone();

        assert!(engine.import_csv(b"name,walk\nframe_000.png,1\n").is_err());
        assert!(engine.import_csv(b"filename,w\xffalk\nframe_000.png,1\n").is_err());
        assert!(engine.import_csv(b"filename,walk\nframe_\xff.png,1\n").is_err());
        assert_eq!(engine.config(), &config);
        assert_eq!(engine.labels(), &labels);
    }

    #[test]
    fn test_regrouping_keeps_one_option_per_group() {
        let mut engine = engine(2);
        engine.apply_label_lines(&["walk", "sunny", "cloudy"]).unwrap();
        let frame = engine.frames()[0].clone();
        engine.set_active(&frame, "walk", true);
        engine.set_active(&frame, "cloudy", true);
        engine.set_active(&frame, "sunny", true);

        engine
            .apply_label_lines(&["walk", "## weather", "sunny", "cloudy"])
            .unwrap();

        let active = engine.active_labels(&frame);
        assert_eq!(active.iter().collect::<Vec<_>>(), vec!["sunny", "walk"]);
        let csv = String::from_utf8(engine.export_csv(false).unwrap()).unwrap();
        assert_eq!(csv, "filename,walk,sunny,cloudy\nframe_000.png,1,1,0\n");
    }

    #[test]
    fn test_import_counts_each_frame_once() {
        let mut engine = engine(3);

        let report = engine
            .import_csv(b"filename,walk\nframe_000.png,1\nframe_000.png,0\n")
            .unwrap();

        assert_eq!(report.frames_updated, 1);
        assert_eq!(report.skipped_rows, 0);
        // Last row for a frame wins
        assert!(engine.current_labels().is_empty());
    }

    #[test]
    fn test_checkbox_csv_roundtrip_is_fixed_point() {
        let mut engine = engine(4);
        engine.apply_label_lines(&["walk", "run", "sit"]).unwrap();
        let frames = engine.frames().to_vec();
        engine.set_active(&frames[0], "walk", true);
        engine.set_active(&frames[0], "sit", true);
        engine.set_active(&frames[2], "run", true);
        let before = engine.labels().clone();

        let bytes = engine.export_csv(false).unwrap();
        engine.import_csv(&bytes).unwrap();

        assert_eq!(engine.labels(), &before);
    }

    #[test]
    fn test_mutations_persist_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let clock = ManualClock::new();

        let mut engine = LabelingEngine::with_clock(
            SessionDefaults::default(),
            Some(SnapshotStore::new(&path)),
            Box::new(clock.clone()),
        );
        engine.set_frames(Some(PathBuf::from("/data/seq")), frame_keys(4));
        engine
            .apply_label_lines(&["walk", "## weather", "sunny", "cloudy"])
            .unwrap();
        engine.toggle_pin("cloudy");
        engine.go_to(2);
        engine.toggle_active("walk");
        engine.set_play_speed(30.0);
        let expected = engine.snapshot();

        let mut restored = LabelingEngine::with_clock(
            SessionDefaults::default(),
            Some(SnapshotStore::new(&path)),
            Box::new(clock),
        );
        assert_eq!(restored.restore(), RestoreOutcome::Restored { frames: 4 });
        assert_eq!(restored.snapshot(), expected);
        assert_eq!(restored.current_index(), 2);
        assert!(restored.current_labels().contains("walk"));
        assert!(restored.current_labels().contains("cloudy"));
        assert_eq!(restored.selected_path(), Some(Path::new("/data/seq")));
    }

    #[test]
    fn test_corrupt_snapshot_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "\u{0}garbage").unwrap();

        let mut engine =
            LabelingEngine::new(SessionDefaults::default(), Some(SnapshotStore::new(&path)));
        assert!(matches!(engine.restore(), RestoreOutcome::Discarded { .. }));
        assert!(!path.exists());
        assert!(engine.frames().is_empty());
        assert_eq!(engine.config().checkbox_labels().len(), 3);
    }

    #[test]
    fn test_snapshot_with_bad_config_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SnapshotStore::new(&path);

        let mut snapshot = engine(2).snapshot();
        snapshot.label_config = vec!["walk".into(), "walk".into()];
        store.save(&snapshot).unwrap();

        let mut engine = LabelingEngine::new(SessionDefaults::default(), Some(store));
        assert!(matches!(engine.restore(), RestoreOutcome::Discarded { .. }));
        assert!(engine.frames().is_empty());
    }

    #[test]
    fn test_restore_resets_out_of_range_index() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("session.json"));

        let mut snapshot = engine(2).snapshot();
        snapshot.playback.current_frame_index = 9;
        store.save(&snapshot).unwrap();

        let mut engine = LabelingEngine::new(SessionDefaults::default(), Some(store));
        assert_eq!(engine.restore(), RestoreOutcome::Restored { frames: 2 });
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn test_restore_starts_paused() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("session.json"));

        let mut playing = engine(3);
        playing.play();
        store.save(&playing.snapshot()).unwrap();

        let clock = ManualClock::new();
        let mut engine =
            LabelingEngine::with_clock(SessionDefaults::default(), Some(store), Box::new(clock));
        assert_eq!(engine.restore(), RestoreOutcome::Restored { frames: 3 });
        assert!(!engine.is_playing());
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_restore_without_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("session.json"));

        let mut engine = LabelingEngine::new(SessionDefaults::default(), Some(store));
        assert_eq!(engine.restore(), RestoreOutcome::Missing);
        assert_eq!(
            LabelingEngine::new(SessionDefaults::default(), None).restore(),
            RestoreOutcome::Missing
        );
    }

    #[test]
    fn test_reset_discards_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let clock = ManualClock::new();
        let mut engine = LabelingEngine::with_clock(
            SessionDefaults::default(),
            Some(SnapshotStore::new(&path)),
            Box::new(clock),
        );
        engine.set_frames(None, frame_keys(3));
        engine.toggle_active("Label A");
        engine.toggle_pin("Label B");
        engine.set_play_speed(50.0);
        assert!(path.exists());

        engine.reset();

        assert!(!path.exists());
        assert!(engine.frames().is_empty());
        assert!(engine.labels().is_empty());
        assert!(engine.pins().is_empty());
        assert_eq!(engine.play_speed(), 10.0);
        assert!(engine.selected_path().is_none());
    }

    #[test]
    fn test_persist_failure_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("session.json");
        let mut engine =
            LabelingEngine::new(SessionDefaults::default(), Some(SnapshotStore::new(&path)));

        engine.set_frames(None, frame_keys(2));
        engine.toggle_active("Label A");

        assert!(engine.current_labels().contains("Label A"));
        assert!(engine.last_persist_error().is_some());
    }
}
