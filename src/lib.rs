// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame labeling tool.
//!
//! Assigns categorical labels to an ordered sequence of still images,
//! keeps the session on disk between runs and exports the result as a
//! wide CSV table. [`engine::LabelingEngine`] holds all session state; the
//! [`app`] module is an egui front-end driving it.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod models;
pub mod ui;
pub mod util;

pub use engine::{LabelingEngine, RestoreOutcome, SessionDefaults};
pub use error::{EngineError, EngineResult};
