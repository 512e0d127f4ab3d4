// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings are read from a YAML file. Every field has a default, so a file
//! only needs the keys it wants to change.

use crate::error::EngineResult;
use crate::models::playback::DEFAULT_PLAY_SPEED;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV_VAR: &str = "FRAMELABEL_CONFIG";
/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "framelabel.yaml";

/// User-adjustable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory the folder picker opens in.
    pub data_root: PathBuf,
    /// Where the session snapshot is written.
    pub snapshot_path: PathBuf,
    /// Initial playback rate in frames per second.
    pub default_play_speed: f64,
    /// Label configuration lines used for a fresh session.
    pub default_labels: Vec<String>,
    /// Suggested file name for CSV export.
    pub export_file_name: String,
    /// Whether CSV export includes frames without labels.
    pub include_unlabeled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("./data"),
            snapshot_path: PathBuf::from(".session_state.json"),
            default_play_speed: DEFAULT_PLAY_SPEED,
            default_labels: vec![
                "Label A".to_string(),
                "Label B".to_string(),
                "Label C".to_string(),
            ],
            export_file_name: "labels.csv".to_string(),
            include_unlabeled: false,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text.
    pub fn from_yaml(yaml: &str) -> EngineResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read settings from a YAML file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let settings = Self::from_yaml(&yaml)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Locate and read the settings file.
    ///
    /// Uses the file named by `FRAMELABEL_CONFIG` if set, otherwise
    /// `framelabel.yaml` in the working directory if it exists, otherwise
    /// the defaults.
    pub fn discover() -> EngineResult<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }
        log::debug!("No settings file found, using defaults");
        Ok(Self::default())
    }
}
