// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback state: play/pause, frame cursor, target and measured rate.
//!
//! The controller owns no thread. The caller invokes a tick once per UI
//! frame while playing; the tick waits out the pacing interval, advances the
//! cursor and measures the real rate from wall-clock time.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Slowest allowed target rate in frames per second.
pub const MIN_PLAY_SPEED: f64 = 1.0;
/// Fastest allowed target rate in frames per second.
pub const MAX_PLAY_SPEED: f64 = 60.0;
/// Target rate used when nothing else is configured.
pub const DEFAULT_PLAY_SPEED: f64 = 10.0;

/// Source of wall-clock time and pacing waits.
pub trait Clock {
    fn now(&self) -> SystemTime;
    fn sleep(&self, duration: Duration);
}

/// Real clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Result of a single playback tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing happened.
    Idle,
    /// Advanced to the given frame index.
    Advanced(usize),
    /// Reached the last frame and stopped.
    Finished,
}

/// Playback cursor and transport state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    pub is_playing: bool,
    pub current_frame_index: usize,
    pub play_speed: f64,
    pub last_update_time: Option<SystemTime>,
    pub actual_fps: f64,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(DEFAULT_PLAY_SPEED)
    }
}

impl Playback {
    /// Create an idle controller at frame 0.
    pub fn new(play_speed: f64) -> Self {
        Self {
            is_playing: false,
            current_frame_index: 0,
            play_speed: clamp_speed(play_speed).unwrap_or(DEFAULT_PLAY_SPEED),
            last_update_time: None,
            actual_fps: 0.0,
        }
    }

    /// Start playing. Has no effect if already playing.
    pub fn start(&mut self, now: SystemTime) {
        if self.is_playing {
            return;
        }
        self.is_playing = true;
        self.last_update_time = Some(now);
        log::debug!(
            "Playback started at frame {} ({} fps)",
            self.current_frame_index,
            self.play_speed
        );
    }

    /// Stop playing, leaving everything else as is.
    pub fn pause(&mut self) {
        if self.is_playing {
            log::debug!("Playback paused at frame {}", self.current_frame_index);
        }
        self.is_playing = false;
    }

    /// Set the target rate. Values are clamped to the supported range and
    /// non-finite values are ignored. Returns `true` if the rate changed.
    pub fn set_speed(&mut self, fps: f64) -> bool {
        match clamp_speed(fps) {
            Some(speed) if speed != self.play_speed => {
                self.play_speed = speed;
                log::debug!("Playback speed set to {} fps", speed);
                true
            }
            _ => false,
        }
    }

    /// Time to wait between two advanced frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.play_speed)
    }

    /// Whether a tick would advance rather than stop.
    pub fn can_advance(&self, frame_count: usize) -> bool {
        self.current_frame_index + 1 < frame_count
    }

    /// Move the cursor one frame forward and update the measured rate.
    ///
    /// The caller is responsible for the pacing wait and for checking
    /// [`can_advance`](Self::can_advance) first.
    pub fn advance(&mut self, now: SystemTime) -> usize {
        self.current_frame_index += 1;
        if let Some(elapsed) = self
            .last_update_time
            .and_then(|last| now.duration_since(last).ok())
            .filter(|elapsed| !elapsed.is_zero())
        {
            self.actual_fps = 1.0 / elapsed.as_secs_f64();
        }
        self.last_update_time = Some(now);
        self.current_frame_index
    }

    /// Clamp `index` into the frame range and stop playing.
    ///
    /// Returns the new index if the cursor moved, `None` if it stayed where
    /// it was or there are no frames.
    pub fn go_to(&mut self, index: i64, frame_count: usize) -> Option<usize> {
        if frame_count == 0 {
            return None;
        }
        self.pause();

        let last = (frame_count - 1) as i64;
        let target = index.clamp(0, last) as usize;
        if target == self.current_frame_index {
            return None;
        }
        self.current_frame_index = target;
        log::debug!("Moved to frame {}", target);
        Some(target)
    }

    /// Keep the cursor inside `[0, frame_count)`. Returns `true` if it had
    /// to be reset.
    pub fn ensure_in_range(&mut self, frame_count: usize) -> bool {
        if frame_count > 0 && self.current_frame_index >= frame_count {
            self.current_frame_index = 0;
            return true;
        }
        false
    }
}

fn clamp_speed(fps: f64) -> Option<f64> {
    fps.is_finite()
        .then(|| fps.clamp(MIN_PLAY_SPEED, MAX_PLAY_SPEED))
}
