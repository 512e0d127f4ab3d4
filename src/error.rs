// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the labeling engine.

use thiserror::Error;

/// Errors that can occur while configuring, persisting, importing or
/// exporting labeling state.
#[derive(Error, Debug)]
pub enum EngineError {
    /// File I/O error (read, write, directory walk).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding/decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Snapshot JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings YAML error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The same label name appears more than once in a configuration.
    #[error("Duplicate label name: {label}")]
    DuplicateLabel { label: String },

    /// A label name cannot be represented in a label configuration.
    #[error("Invalid label name {label:?}: {reason}")]
    InvalidLabelName { label: String, reason: String },

    /// A label configuration contains no labels at all.
    #[error("Label configuration is empty")]
    EmptyConfiguration,

    /// The imported CSV has no `filename` column.
    #[error("CSV has no `filename` column")]
    MissingFilenameColumn,

    /// The snapshot was written by another format or schema version.
    #[error("Unsupported snapshot: format {format:?}, version {version}")]
    UnsupportedSnapshot { format: String, version: u32 },

    /// The snapshot parsed but its contents are inconsistent.
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },
}

/// Convenience Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
