// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Core labeling data model.

pub mod label_config;
pub mod label_store;
pub mod pins;
pub mod playback;

pub use label_config::{LabelConfig, RadioGroup};
pub use label_store::{LabelSet, LabelStore};
pub use pins::FixedLabels;
pub use playback::{Clock, Playback, SystemClock, TickOutcome};
