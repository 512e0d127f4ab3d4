// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session snapshot persistence.
//!
//! The whole labeling session is written as one JSON document tagged with a
//! format name and schema version. Documents with another tag are rejected
//! instead of being half-read.

use crate::error::{EngineError, EngineResult};
use crate::models::{FixedLabels, LabelStore, Playback};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Format tag written into every snapshot.
pub const SNAPSHOT_FORMAT: &str = "framelabel-session";
/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Complete persisted session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub format: String,
    pub version: u32,
    pub selected_path: Option<PathBuf>,
    pub frames: Vec<String>,
    pub label_config: Vec<String>,
    pub labels: LabelStore,
    pub fixed_labels: FixedLabels,
    pub playback: Playback,
}

impl SessionSnapshot {
    /// Tag a set of session fields with the current format and version.
    pub fn new(
        selected_path: Option<PathBuf>,
        frames: Vec<String>,
        label_config: Vec<String>,
        labels: LabelStore,
        fixed_labels: FixedLabels,
        playback: Playback,
    ) -> Self {
        Self {
            format: SNAPSHOT_FORMAT.to_string(),
            version: SNAPSHOT_VERSION,
            selected_path,
            frames,
            label_config,
            labels,
            fixed_labels,
            playback,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot, checking the format tag before the body.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        let format = value
            .get("format")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let version = value
            .get("version")
            .and_then(|v| v.as_u64())
            .unwrap_or_default();
        if format != SNAPSHOT_FORMAT || version != u64::from(SNAPSHOT_VERSION) {
            return Err(EngineError::UnsupportedSnapshot {
                format: format.to_string(),
                version: u32::try_from(version).unwrap_or(u32::MAX),
            });
        }

        Ok(serde_json::from_value(value)?)
    }
}

/// Location of the durable snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Overwrite the snapshot file with `snapshot`.
    ///
    /// Data goes to a sibling temporary file which is then renamed over the
    /// target.
    pub fn save(&self, snapshot: &SessionSnapshot) -> EngineResult<()> {
        let json = snapshot.to_json()?;
        let temp_path = self.path.with_extension("json.tmp");

        std::fs::write(&temp_path, json.as_bytes())?;
        if let Err(e) = std::fs::rename(&temp_path, &self.path) {
            if let Err(cleanup) = std::fs::remove_file(&temp_path) {
                log::debug!(
                    "Could not remove temporary snapshot {}: {}",
                    temp_path.display(),
                    cleanup
                );
            }
            return Err(e.into());
        }

        log::debug!("Saved session snapshot to {}", self.path.display());
        Ok(())
    }

    /// Read the snapshot, or `None` if there is none.
    pub fn load(&self) -> EngineResult<Option<SessionSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)?;
        let snapshot = SessionSnapshot::from_json(&json)?;
        Ok(Some(snapshot))
    }

    /// Delete the snapshot file if present.
    pub fn discard(&self) -> EngineResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Discarded session snapshot {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
