// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for frames, label tables and session snapshots.

pub mod csv_codec;
pub mod media;
pub mod snapshot;
