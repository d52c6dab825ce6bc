//! Title-prefix styling for body bullets.
//!
//! A slide whose title starts with a known keyword gets its bullets rendered
//! with a fixed weight and size. Rules are checked in order; the first prefix
//! that matches wins.

use crate::types::TextStyle;
use serde::{Deserialize, Serialize};

/// A single `prefix -> style` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    /// Title prefix, compared case-insensitively.
    pub prefix: String,
    #[serde(default)]
    pub bold: bool,
    /// Font size in points.
    pub size: f64,
}

impl StyleRule {
    pub fn new(prefix: impl Into<String>, bold: bool, size: f64) -> Self {
        Self {
            prefix: prefix.into(),
            bold,
            size,
        }
    }

    fn matches(&self, lowered_title: &str) -> bool {
        lowered_title.starts_with(&self.prefix.to_lowercase())
    }

    pub fn style(&self) -> TextStyle {
        TextStyle {
            bold: self.bold,
            size: self.size,
        }
    }
}

/// Ordered table of style rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleRules {
    rules: Vec<StyleRule>,
}

impl StyleRules {
    /// A table with no rules; every title keeps the template styling.
    pub fn none() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn new(rules: Vec<StyleRule>) -> Self {
        Self { rules }
    }

    /// Style for bullets under `title`, if any rule's prefix starts it.
    pub fn style_for(&self, title: &str) -> Option<TextStyle> {
        let lowered = title.trim_start().to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(StyleRule::style)
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }
}

impl Default for StyleRules {
    /// Agenda slides get bold 24pt bullets, objective slides plain 18pt.
    fn default() -> Self {
        Self::new(vec![
            StyleRule::new("agenda", true, 24.0),
            StyleRule::new("objetivos", false, 18.0),
        ])
    }
}
