//! Deck configuration: layout catalog mapping, style rules, and the image
//! extensions recognized by the parser.
//!
//! Loaded from an optional TOML file. Top-level keys that are absent keep
//! their built-in defaults; a present `[layouts]` table replaces the
//! reference mapping entirely and must contain a `contenido` entry.

use crate::error::{Error, Result};
use crate::parser::{ParserOptions, DEFAULT_IMAGE_EXTENSIONS};
use crate::style::{StyleRule, StyleRules};
use crate::types::{LayoutMap, CONTENT_LAYOUT};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckConfig {
    pub layouts: LayoutMap,
    pub styles: StyleRules,
    pub image_extensions: Vec<String>,
}

/// On-disk shape of the configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    layouts: Option<BTreeMap<String, usize>>,
    styles: Option<Vec<StyleRule>>,
    image_extensions: Option<Vec<String>>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            layouts: LayoutMap::default(),
            styles: StyleRules::default(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl DeckConfig {
    /// Read and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;

        let mut config = Self::default();

        if let Some(layouts) = raw.layouts {
            let mut map = LayoutMap::empty();
            for (tag, template) in layouts {
                map.insert(tag, template);
            }
            config.layouts = map;
        }
        if let Some(styles) = raw.styles {
            config.styles = StyleRules::new(styles);
        }
        if let Some(extensions) = raw.image_extensions {
            config.image_extensions = extensions;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.layouts.has_fallback() {
            return Err(Error::Config(format!(
                "layouts must define a '{}' entry",
                CONTENT_LAYOUT
            )));
        }

        for rule in self.styles.rules() {
            if rule.prefix.trim().is_empty() {
                return Err(Error::Config("style rule with an empty prefix".to_string()));
            }
            if !(rule.size > 0.0) {
                return Err(Error::Config(format!(
                    "style rule '{}' has non-positive size {}",
                    rule.prefix, rule.size
                )));
            }
        }

        if self.image_extensions.is_empty() {
            return Err(Error::Config("image_extensions must not be empty".to_string()));
        }
        if self.image_extensions.iter().any(|ext| ext.is_empty()) {
            return Err(Error::Config("empty image extension".to_string()));
        }

        Ok(())
    }

    /// Parser options derived from this configuration.
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            image_extensions: self.image_extensions.clone(),
        }
    }
}
