// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the frame labeling application.

pub mod canvas;
pub mod config_panel;
pub mod label_panel;
pub mod timeline;
pub mod toolbar;
