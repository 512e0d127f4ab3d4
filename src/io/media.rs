// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame discovery and image loading.
//!
//! Frames are still images found under a root directory. They are keyed by
//! their path and ordered lexicographically, which is the order used for
//! navigation and export.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File extensions recognised as frames (compared case-insensitively).
pub const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff"];

/// Decoded RGBA image ready to be turned into a texture.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Check whether `path` has one of the frame extensions.
pub fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Recursively collect frame paths under `root`, sorted by full path.
///
/// Hidden files and directories (names starting with `.`) are skipped, and
/// symlinked directories are not followed. Only an unreadable `root` is an
/// error; unreadable subdirectories are logged and skipped.
pub fn discover_frames(root: &Path) -> std::io::Result<Vec<String>> {
    let mut frames = Vec::new();
    let mut pending: Vec<PathBuf> = Vec::new();

    collect_dir(root, &mut frames, &mut pending)?;
    while let Some(dir) = pending.pop() {
        if let Err(e) = collect_dir(&dir, &mut frames, &mut pending) {
            log::warn!("Skipping unreadable directory {}: {}", dir.display(), e);
        }
    }

    frames.sort();
    log::info!("Found {} frames under {}", frames.len(), root.display());
    Ok(frames)
}

fn collect_dir(
    dir: &Path,
    frames: &mut Vec<String>,
    pending: &mut Vec<PathBuf>,
) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            pending.push(path);
        } else if file_type.is_symlink() && path.is_dir() {
            log::debug!("Not following directory link {}", path.display());
        } else if is_frame_file(&path) {
            frames.push(path.to_string_lossy().into_owned());
        }
    }
    Ok(())
}

/// Base file name of a frame key, used as the CSV row key.
pub fn frame_file_name(frame: &str) -> String {
    Path::new(frame)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| frame.to_string())
}

/// Decode an image file into RGBA pixels.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();

    Ok(LoadedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}
