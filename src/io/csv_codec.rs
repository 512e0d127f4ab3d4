// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Wide-format CSV export and import of label assignments.
//!
//! The table has a `filename` column holding each frame's base name and one
//! `0`/`1` column per label. Import reads the same shape back and turns the
//! header into a new, flat label configuration.

use super::media::frame_file_name;
use crate::error::{EngineError, EngineResult};
use crate::models::{LabelConfig, LabelSet, LabelStore};
use std::collections::{BTreeMap, HashMap};

/// Name of the row key column.
pub const FILENAME_COLUMN: &str = "filename";

/// Export the label matrix for `frames` in sequence order.
///
/// Frames with no active label are left out unless `include_unlabeled` is
/// set.
pub fn export(
    frames: &[String],
    store: &LabelStore,
    labels: &[&str],
    include_unlabeled: bool,
) -> EngineResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = Vec::with_capacity(labels.len() + 1);
    header.push(FILENAME_COLUMN);
    header.extend_from_slice(labels);
    writer.write_record(&header)?;

    let mut rows = 0;
    for frame in frames {
        let active = store.active(frame);
        let is_unlabeled = active.map_or(true, |set| set.is_empty());
        if is_unlabeled && !include_unlabeled {
            continue;
        }

        let mut record = Vec::with_capacity(labels.len() + 1);
        record.push(frame_file_name(frame));
        for label in labels {
            let on = active.is_some_and(|set| set.contains(*label));
            record.push(if on { "1" } else { "0" }.to_string());
        }
        writer.write_record(&record)?;
        rows += 1;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    log::info!("Exported {} rows x {} labels", rows, labels.len());
    Ok(bytes)
}

/// Parsed contents of an imported label table.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedLabels {
    /// Flat configuration built from the header.
    pub config: LabelConfig,
    /// New active set per matched frame key. A frame named by several rows
    /// gets the last of them.
    pub assignments: BTreeMap<String, LabelSet>,
    /// Rows whose file name matched no frame.
    pub skipped_rows: usize,
}

/// Counts reported after an import is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub labels_adopted: usize,
    pub frames_updated: usize,
    pub skipped_rows: usize,
}

/// Parse a label table against the known `frames`.
///
/// Rows are matched by base file name. When several frames share a base
/// name the first one in sequence order receives the row; when several rows
/// resolve to one frame the last row wins. Nothing is
/// applied here; a returned error means nothing should change.
pub fn import(data: &[u8], frames: &[String]) -> EngineResult<ImportedLabels> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let filename_col = headers
        .iter()
        .position(|h| h == FILENAME_COLUMN)
        .ok_or(EngineError::MissingFilenameColumn)?;

    let label_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != filename_col)
        .map(|(idx, name)| (idx, name.as_str()))
        .collect();
    let label_names: Vec<&str> = label_columns.iter().map(|(_, name)| *name).collect();
    let config = LabelConfig::flat(&label_names)?;

    let mut by_name: HashMap<String, &str> = HashMap::new();
    for frame in frames {
        by_name.entry(frame_file_name(frame)).or_insert(frame.as_str());
    }

    let mut assignments = BTreeMap::new();
    let mut skipped_rows = 0;
    for record in reader.records() {
        let record = record?;
        let name = record.get(filename_col).unwrap_or_default().trim();
        let Some(frame) = by_name.get(name) else {
            log::debug!("No frame named {:?}, skipping row", name);
            skipped_rows += 1;
            continue;
        };

        let active: LabelSet = label_columns
            .iter()
            .filter(|(idx, _)| record.get(*idx).is_some_and(|cell| cell.trim() == "1"))
            .map(|(_, label)| label.to_string())
            .collect();
        if assignments.insert(frame.to_string(), active).is_some() {
            log::debug!("Row for {:?} replaces an earlier row", name);
        }
    }

    Ok(ImportedLabels {
        config,
        assignments,
        skipped_rows,
    })
}
