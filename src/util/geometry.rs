// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Scaling helpers used to fit a frame into the available display area.

/// Largest size with the image's aspect ratio that fits inside the
/// available area.
pub fn fit_within(image_width: u32, image_height: u32, available: (f32, f32)) -> (f32, f32) {
    let (avail_w, avail_h) = available;
    if image_width == 0 || image_height == 0 || avail_w <= 0.0 || avail_h <= 0.0 {
        return (0.0, 0.0);
    }

    let img_aspect = image_width as f32 / image_height as f32;
    let available_aspect = avail_w / avail_h;

    if img_aspect > available_aspect {
        // Image is wider - fit to width
        (avail_w, avail_w / img_aspect)
    } else {
        // Image is taller - fit to height
        (avail_h * img_aspect, avail_h)
    }
}

/// Offset that centers a box of `size` inside `available`.
pub fn center_offset(size: (f32, f32), available: (f32, f32)) -> (f32, f32) {
    ((available.0 - size.0) / 2.0, (available.1 - size.1) / 2.0)
}
