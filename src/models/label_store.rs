// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-frame label assignments.
//!
//! The store maps a frame key to the set of label names active on that
//! frame. Writes go through [`LabelStore::set_active`], which keeps at most
//! one option of each radio group active per frame.

use super::label_config::LabelConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Set of active label names for one frame.
pub type LabelSet = BTreeSet<String>;

/// Mapping from frame key to its active labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelStore {
    frames: BTreeMap<String, LabelSet>,
}

impl LabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate or deactivate `label` on `frame`.
    ///
    /// Activating a radio option removes the group's other options first.
    /// Labels that are not radio options are toggled independently. Returns
    /// `true` if the frame's set changed.
    pub fn set_active(
        &mut self,
        frame: &str,
        label: &str,
        active: bool,
        config: &LabelConfig,
    ) -> bool {
        if !active {
            return match self.frames.get_mut(frame) {
                Some(set) => set.remove(label),
                None => false,
            };
        }

        let set = self.frames.entry(frame.to_string()).or_default();
        let mut changed = false;
        if let Some(group) = config.group_of(label) {
            for option in group.options.iter().filter(|o| o.as_str() != label) {
                changed |= set.remove(option);
            }
        }
        changed |= set.insert(label.to_string());
        changed
    }

    /// Active labels of `frame`, empty for a frame never written to.
    pub fn get_active(&self, frame: &str) -> LabelSet {
        self.frames.get(frame).cloned().unwrap_or_default()
    }

    /// Borrowing variant of [`get_active`](Self::get_active).
    pub fn active(&self, frame: &str) -> Option<&LabelSet> {
        self.frames.get(frame)
    }

    pub fn is_active(&self, frame: &str, label: &str) -> bool {
        self.frames
            .get(frame)
            .is_some_and(|set| set.contains(label))
    }

    /// Replace the whole active set of `frame`.
    pub fn replace(&mut self, frame: &str, labels: LabelSet) {
        self.frames.insert(frame.to_string(), labels);
    }

    /// Mutable access to a frame's set, creating it on first use.
    pub(crate) fn entry(&mut self, frame: &str) -> &mut LabelSet {
        self.frames.entry(frame.to_string()).or_default()
    }

    /// Drop a frame's entry entirely.
    pub(crate) fn forget(&mut self, frame: &str) {
        self.frames.remove(frame);
    }

    /// Bring every frame in line with the radio groups of `config`.
    ///
    /// Where a frame has several options of one group active, the option
    /// listed first in the configuration is kept. Returns the number of
    /// frames that changed.
    pub fn enforce_groups(&mut self, config: &LabelConfig) -> usize {
        let mut changed = 0;
        for set in self.frames.values_mut() {
            let mut frame_changed = false;
            for group in config.radio_groups() {
                let mut active = group.options.iter().filter(|o| set.contains(*o));
                if active.next().is_none() {
                    continue;
                }
                let extra: Vec<String> = active.cloned().collect();
                for option in extra {
                    set.remove(&option);
                    frame_changed = true;
                }
            }
            if frame_changed {
                changed += 1;
            }
        }
        changed
    }

    /// Iterate over every written frame and its labels.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &LabelSet)> {
        self.frames.iter()
    }

    /// Number of frames that have at least one active label.
    pub fn labeled_count(&self) -> usize {
        self.frames.values().filter(|set| !set.is_empty()).count()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
