//! Domain types for representing a parsed deck and the geometry it is
//! rendered into.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layout tag of the cover slide.
pub const COVER_LAYOUT: &str = "portada";

/// Layout tag of a regular title + bullets slide. Also the fallback layout.
pub const CONTENT_LAYOUT: &str = "contenido";

/// Layout tag of a title + picture slide.
pub const IMAGE_LAYOUT: &str = "imagen";

/// The render path a slide takes.
///
/// Parsed from the free-form tag of a `[layout: ...]` directive. Any tag that
/// is not the cover or image tag is a body layout; the original tag is kept so
/// it can still select its own template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Layout {
    /// Title-only slide whose title carries every descriptive line.
    Cover,
    /// Title plus a single scaled and centered picture.
    Image,
    /// Title plus a bulleted body, keyed by its layout tag.
    Body(String),
}

impl Layout {
    /// Classify a layout tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            COVER_LAYOUT => Self::Cover,
            IMAGE_LAYOUT => Self::Image,
            other => Self::Body(other.to_string()),
        }
    }

    /// The tag this layout was parsed from.
    pub fn tag(&self) -> &str {
        match self {
            Self::Cover => COVER_LAYOUT,
            Self::Image => IMAGE_LAYOUT,
            Self::Body(tag) => tag,
        }
    }

    pub fn is_cover(&self) -> bool {
        matches!(self, Self::Cover)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::Body(CONTENT_LAYOUT.to_string())
    }
}

impl From<String> for Layout {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<Layout> for String {
    fn from(layout: Layout) -> Self {
        layout.tag().to_string()
    }
}

/// One slide as described by a markdown segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideBlock {
    /// Slide title. Multi-line for cover slides.
    pub title: Option<String>,

    /// Body bullets in document order.
    pub bullets: Vec<String>,

    /// Image file paths in document order.
    pub images: Vec<String>,

    /// Layout selecting the template and render path.
    pub layout: Layout,
}

impl SlideBlock {
    /// Title text, or an empty string for an untitled block.
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// An ordered sequence of slide blocks, one per output slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    slides: Vec<SlideBlock>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide block. Order of insertion is output order.
    pub fn push(&mut self, block: SlideBlock) {
        self.slides.push(block);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SlideBlock> {
        self.slides.iter()
    }

    pub fn slides(&self) -> &[SlideBlock] {
        &self.slides
    }
}

impl From<Vec<SlideBlock>> for Deck {
    fn from(slides: Vec<SlideBlock>) -> Self {
        Self { slides }
    }
}

impl IntoIterator for Deck {
    type Item = SlideBlock;
    type IntoIter = std::vec::IntoIter<SlideBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.into_iter()
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a SlideBlock;
    type IntoIter = std::slice::Iter<'a, SlideBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}

/// Mapping from layout tag to an index into the template's layout catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutMap {
    entries: BTreeMap<String, usize>,
}

impl LayoutMap {
    /// Create an empty map. An empty map resolves nothing until a
    /// `contenido` entry is added.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, tag: impl Into<String>, template: usize) -> Self {
        self.insert(tag, template);
        self
    }

    pub fn insert(&mut self, tag: impl Into<String>, template: usize) {
        self.entries.insert(tag.into(), template);
    }

    pub fn get(&self, tag: &str) -> Option<usize> {
        self.entries.get(tag).copied()
    }

    /// Resolve a tag to its template, falling back to the content layout.
    pub fn resolve(&self, tag: &str) -> Option<usize> {
        self.get(tag).or_else(|| self.get(CONTENT_LAYOUT))
    }

    /// Whether the fallback entry exists.
    pub fn has_fallback(&self) -> bool {
        self.entries.contains_key(CONTENT_LAYOUT)
    }
}

impl Default for LayoutMap {
    /// The reference configuration: cover 0, content 1, image 2.
    fn default() -> Self {
        Self::empty()
            .with(COVER_LAYOUT, 0)
            .with(CONTENT_LAYOUT, 1)
            .with(IMAGE_LAYOUT, 2)
    }
}

/// A rectangle in EMUs (English Metric Units, 914400 EMU = 1 inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Region {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Frame for an image of `image_width` x `image_height` pixels, scaled
    /// uniformly to fit entirely inside this region and centered on both axes.
    ///
    /// Returns `None` for an image with a zero dimension.
    pub fn fit(&self, image_width: u32, image_height: u32) -> Option<Region> {
        if image_width == 0 || image_height == 0 {
            return None;
        }

        let iw = f64::from(image_width);
        let ih = f64::from(image_height);
        let scale = (self.width as f64 / iw).min(self.height as f64 / ih);

        let width = (iw * scale).round() as i64;
        let height = (ih * scale).round() as i64;

        Some(Region {
            x: self.x + (self.width - width) / 2,
            y: self.y + (self.height - height) / 2,
            width,
            height,
        })
    }
}

/// Character formatting applied to every run of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub bold: bool,
    /// Font size in points.
    pub size: f64,
}

/// One body paragraph with an optional style override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    /// `None` keeps the template's default styling.
    pub style: Option<TextStyle>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: Option<TextStyle>) -> Self {
        self.style = style;
        self
    }
}

/// Handle to a slide created by a document engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlideId(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_tag() {
        assert_eq!(Layout::from_tag("portada"), Layout::Cover);
        assert_eq!(Layout::from_tag("imagen"), Layout::Image);
        assert_eq!(
            Layout::from_tag("foo"),
            Layout::Body("foo".to_string())
        );
        assert_eq!(Layout::from_tag("foo").tag(), "foo");
        assert_eq!(Layout::default().tag(), "contenido");
    }

    #[test]
    fn test_layout_serializes_as_tag() {
        let block = SlideBlock {
            title: Some("Intro".to_string()),
            layout: Layout::Cover,
            ..Default::default()
        };
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains(r#""layout":"portada""#));

        let back: SlideBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back.layout, Layout::Cover);
    }

    #[test]
    fn test_layout_map_fallback() {
        let map = LayoutMap::default();
        assert_eq!(map.resolve("portada"), Some(0));
        assert_eq!(map.resolve("imagen"), Some(2));
        assert_eq!(map.resolve("foo"), map.get("contenido"));

        let no_fallback = LayoutMap::empty().with("portada", 0);
        assert_eq!(no_fallback.resolve("foo"), None);
        assert!(!no_fallback.has_fallback());
    }

    #[test]
    fn test_fit_wide_image() {
        // 2:1 image in a 1000x1000 region fills the width and centers vertically.
        let region = Region::new(100, 200, 1000, 1000);
        let frame = region.fit(400, 200).unwrap();
        assert_eq!(frame, Region::new(100, 450, 1000, 500));
    }

    #[test]
    fn test_fit_tall_image() {
        let region = Region::new(0, 0, 1000, 500);
        let frame = region.fit(100, 100).unwrap();
        assert_eq!(frame, Region::new(250, 0, 500, 500));
    }

    #[test]
    fn test_fit_upscales_small_image() {
        let region = Region::new(0, 0, 9000, 3000);
        let frame = region.fit(3, 1).unwrap();
        assert_eq!(frame, Region::new(0, 0, 9000, 3000));
    }

    #[test]
    fn test_fit_zero_sized_image() {
        let region = Region::new(0, 0, 100, 100);
        assert_eq!(region.fit(0, 10), None);
        assert_eq!(region.fit(10, 0), None);
    }
}
