// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label configuration parsing.
//!
//! A label configuration is a list of raw text lines. Plain lines are
//! checkbox labels, `## name` opens a radio group whose following lines are
//! mutually exclusive options. The parsed groups are a derived view of the
//! raw lines and are rebuilt whenever the lines change.

use crate::error::{EngineError, EngineResult};
use std::collections::HashSet;

/// Prefix marking a radio group header line.
pub const GROUP_SIGIL: &str = "##";

/// A named set of mutually exclusive options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioGroup {
    pub name: String,
    pub options: Vec<String>,
}

impl RadioGroup {
    fn new(name: String) -> Self {
        Self {
            name,
            options: Vec::new(),
        }
    }

    /// Check if `label` is one of this group's options.
    pub fn contains(&self, label: &str) -> bool {
        self.options.iter().any(|option| option == label)
    }
}

/// Parsed label configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelConfig {
    raw_lines: Vec<String>,
    checkbox_labels: Vec<String>,
    radio_groups: Vec<RadioGroup>,
}

impl LabelConfig {
    /// Parse raw configuration lines.
    ///
    /// Fails if a label name appears twice anywhere in the configuration.
    pub fn parse<S: AsRef<str>>(raw_lines: &[S]) -> EngineResult<Self> {
        let mut checkbox_labels = Vec::new();
        let mut radio_groups: Vec<RadioGroup> = Vec::new();
        let mut current_group: Option<usize> = None;
        let mut seen = HashSet::new();

        let raw_lines: Vec<String> = raw_lines
            .iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        for line in &raw_lines {
            if let Some(header) = line.strip_prefix(GROUP_SIGIL) {
                let name = header.trim();
                current_group = if name.is_empty() {
                    None
                } else if let Some(idx) = radio_groups.iter().position(|g| g.name == name) {
                    // A repeated header reopens the earlier group
                    Some(idx)
                } else {
                    radio_groups.push(RadioGroup::new(name.to_string()));
                    Some(radio_groups.len() - 1)
                };
                continue;
            }

            if !seen.insert(line.clone()) {
                return Err(EngineError::DuplicateLabel {
                    label: line.clone(),
                });
            }

            match current_group {
                Some(idx) => radio_groups[idx].options.push(line.clone()),
                None => checkbox_labels.push(line.clone()),
            }
        }

        Ok(Self {
            raw_lines,
            checkbox_labels,
            radio_groups,
        })
    }

    /// Parse a multi-line block of text, one entry per line.
    pub fn parse_text(text: &str) -> EngineResult<Self> {
        let lines: Vec<&str> = text.lines().collect();
        Self::parse(&lines)
    }

    /// Build a flat, checkbox-only configuration from label names.
    ///
    /// Used when a CSV header redefines the configuration. Names that would
    /// be read back as group headers are rejected.
    pub fn flat<S: AsRef<str>>(labels: &[S]) -> EngineResult<Self> {
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                return Err(EngineError::InvalidLabelName {
                    label: label.to_string(),
                    reason: "label name is empty".to_string(),
                });
            }
            if label.starts_with(GROUP_SIGIL) {
                return Err(EngineError::InvalidLabelName {
                    label: label.to_string(),
                    reason: format!("starts with the group sigil {GROUP_SIGIL:?}"),
                });
            }
        }
        Self::parse(labels)
    }

    /// Normalized raw lines (trimmed, blanks removed).
    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    /// Render the configuration back to editable text.
    pub fn to_text(&self) -> String {
        self.raw_lines.join("\n")
    }

    pub fn checkbox_labels(&self) -> &[String] {
        &self.checkbox_labels
    }

    pub fn radio_groups(&self) -> &[RadioGroup] {
        &self.radio_groups
    }

    /// Find the radio group that owns `label`, if any.
    pub fn group_of(&self, label: &str) -> Option<&RadioGroup> {
        self.radio_groups.iter().find(|group| group.contains(label))
    }

    pub fn is_checkbox(&self, label: &str) -> bool {
        self.checkbox_labels.iter().any(|l| l == label)
    }

    /// All label names: checkbox labels first, then radio options group by
    /// group in declaration order.
    pub fn all_labels(&self) -> Vec<&str> {
        self.checkbox_labels
            .iter()
            .chain(self.radio_groups.iter().flat_map(|g| g.options.iter()))
            .map(String::as_str)
            .collect()
    }

    /// Number of label names (headers excluded).
    pub fn label_count(&self) -> usize {
        self.checkbox_labels.len()
            + self
                .radio_groups
                .iter()
                .map(|g| g.options.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checkbox_and_group() {
        let config = LabelConfig::parse(&["walk", "## weather", "sunny", "cloudy"]).unwrap();

        assert_eq!(config.checkbox_labels(), &["walk".to_string()]);
        assert_eq!(config.radio_groups().len(), 1);
        assert_eq!(config.radio_groups()[0].name, "weather");
        assert_eq!(config.radio_groups()[0].options, vec!["sunny", "cloudy"]);
    }

    #[test]
    fn test_blank_lines_and_whitespace_ignored() {
        let config =
            LabelConfig::parse(&["  walk  ", "", "   ", "##   weather  ", " sunny"]).unwrap();

        assert_eq!(config.checkbox_labels(), &["walk".to_string()]);
        assert_eq!(config.radio_groups()[0].name, "weather");
        assert_eq!(config.radio_groups()[0].options, vec!["sunny"]);
        assert_eq!(config.raw_lines(), &["walk", "##   weather", "sunny"]);
    }

    #[test]
    fn test_new_header_replaces_current_group() {
        let config =
            LabelConfig::parse(&["## weather", "sunny", "## time", "day", "night"]).unwrap();

        assert!(config.checkbox_labels().is_empty());
        assert_eq!(config.radio_groups()[0].options, vec!["sunny"]);
        assert_eq!(config.radio_groups()[1].name, "time");
        assert_eq!(config.radio_groups()[1].options, vec!["day", "night"]);
    }

    #[test]
    fn test_empty_header_reverts_to_checkbox() {
        let config = LabelConfig::parse(&["## weather", "sunny", "##", "walk"]).unwrap();

        assert_eq!(config.radio_groups().len(), 1);
        assert_eq!(config.radio_groups()[0].options, vec!["sunny"]);
        assert_eq!(config.checkbox_labels(), &["walk".to_string()]);
    }

    #[test]
    fn test_empty_group_is_kept() {
        let config = LabelConfig::parse(&["## empty", "## weather", "sunny"]).unwrap();

        assert_eq!(config.radio_groups().len(), 2);
        assert!(config.radio_groups()[0].options.is_empty());
    }

    #[test]
    fn test_repeated_header_reopens_group() {
        let config = LabelConfig::parse(&[
            "## weather",
            "sunny",
            "## time",
            "day",
            "## weather",
            "rain",
        ])
        .unwrap();

        assert_eq!(config.radio_groups().len(), 2);
        assert_eq!(config.radio_groups()[0].options, vec!["sunny", "rain"]);
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let result = LabelConfig::parse(&["walk", "## weather", "walk"]);
        assert!(matches!(
            result,
            Err(EngineError::DuplicateLabel { label }) if label == "walk"
        ));
    }

    #[test]
    fn test_all_labels_order() {
        let lines = ["walk", "## weather", "sunny", "cloudy", "## time", "day"];
        let config = LabelConfig::parse(&lines).unwrap();

        assert_eq!(config.all_labels(), vec!["walk", "sunny", "cloudy", "day"]);
        assert_eq!(config.label_count(), 4);
        assert_eq!(config.group_of("cloudy").map(|g| g.name.as_str()), Some("weather"));
        assert!(config.group_of("walk").is_none());
        assert!(config.is_checkbox("walk"));
    }

    #[test]
    fn test_flat_rejects_group_sigil() {
        assert!(matches!(
            LabelConfig::flat(&["walk", "##sunny"]),
            Err(EngineError::InvalidLabelName { .. })
        ));
        assert!(matches!(
            LabelConfig::flat(&["walk", " "]),
            Err(EngineError::InvalidLabelName { .. })
        ));

        let config = LabelConfig::flat(&["walk", "sunny"]).unwrap();
        assert!(config.radio_groups().is_empty());
        assert_eq!(config.checkbox_labels().len(), 2);
    }

    #[test]
    fn test_parse_text_roundtrip() {
        let config = LabelConfig::parse_text("walk\r\n## weather\nsunny\n").unwrap();
        let reparsed = LabelConfig::parse_text(&config.to_text()).unwrap();
        assert_eq!(config, reparsed);
    }
}
