// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pinned ("fixed") labels.
//!
//! Pinned labels are applied to every frame the operator navigates to. The
//! set remembers pin order: when several options of one radio group are
//! pinned, the one pinned first is the one applied.

use super::label_config::LabelConfig;
use super::label_store::LabelStore;
use serde::{Deserialize, Serialize};

/// Labels currently pinned, in the order they were pinned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedLabels {
    labels: Vec<String>,
}

impl FixedLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `label` if it is not pinned, unpin it otherwise. Returns `true`
    /// if the label is pinned afterwards.
    pub fn toggle(&mut self, label: &str) -> bool {
        if let Some(pos) = self.labels.iter().position(|l| l == label) {
            self.labels.remove(pos);
            false
        } else {
            self.labels.push(label.to_string());
            true
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Pinned labels in pin order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// Apply the pinned labels to `frame` in `store`.
    ///
    /// Pinned checkbox labels are added. For each radio group with a pinned
    /// option, the group's options are cleared and the earliest pinned
    /// option is set. Pins that name no configured label are ignored.
    /// Returns `true` if the frame's set changed.
    pub fn apply(&self, frame: &str, store: &mut LabelStore, config: &LabelConfig) -> bool {
        if self.labels.is_empty() {
            return false;
        }

        let existed = store.active(frame).is_some();
        let before = store.get_active(frame);
        let set = store.entry(frame);

        for label in self.iter().filter(|l| config.is_checkbox(l)) {
            set.insert(label.to_string());
        }

        for group in config.radio_groups() {
            let Some(chosen) = self.iter().find(|l| group.contains(l)) else {
                continue;
            };
            for option in &group.options {
                set.remove(option);
            }
            set.insert(chosen.to_string());
        }

        let changed = *set != before;
        if !existed && set.is_empty() {
            store.forget(frame);
        }
        if changed {
            log::debug!("Applied {} pinned labels to {}", self.labels.len(), frame);
        }
        changed
    }
}
