//! Layout-dispatch renderer.
//!
//! Each [`SlideBlock`] takes exactly one render path, chosen by its
//! [`Layout`]: cover, image, or textual body. The renderer talks to the output
//! document only through [`SlideDocument`], and reads image sizes only through
//! [`ImageProbe`], so both can be swapped out in tests.

use crate::date::DateFormatter;
use crate::error::{Error, Result};
use crate::style::StyleRules;
use crate::types::{
    Deck, Layout, LayoutMap, Paragraph, Region, SlideBlock, SlideId, CONTENT_LAYOUT,
};
use std::path::{Path, PathBuf};

/// A presentation document that slides can be appended to.
///
/// Slide handles are only valid for the document that issued them.
pub trait SlideDocument {
    /// Append a slide built from template `template` of the layout catalog.
    fn add_slide(&mut self, template: usize) -> Result<SlideId>;

    /// Replace the text of the slide's title region. `\n` separates lines.
    fn set_title(&mut self, slide: SlideId, text: &str) -> Result<()>;

    /// Whether the slide's template has a body text region.
    fn has_body(&self, slide: SlideId) -> bool;

    /// Replace any default body content with `paragraphs`, in order.
    fn set_body(&mut self, slide: SlideId, paragraphs: &[Paragraph]) -> Result<()>;

    /// Bounds of the slide's picture region, if its template has one.
    fn picture_region(&self, slide: SlideId) -> Option<Region>;

    /// Place the image at `path` on the slide at exactly `frame`.
    fn insert_picture(&mut self, slide: SlideId, path: &Path, frame: Region) -> Result<()>;
}

/// Reads native pixel dimensions of an image file.
pub trait ImageProbe {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)>;
}

/// An image that could not be placed. Rendering continued without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFailure {
    /// 0-based index of the slide in the deck.
    pub slide: usize,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a render run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Slides appended to the document.
    pub slides: usize,
    /// Pictures placed on image slides.
    pub images: usize,
    pub image_failures: Vec<ImageFailure>,
}

impl RenderSummary {
    pub fn is_clean(&self) -> bool {
        self.image_failures.is_empty()
    }
}

/// Renders a [`Deck`] into a [`SlideDocument`].
pub struct Renderer {
    layouts: LayoutMap,
    styles: StyleRules,
    probe: Box<dyn ImageProbe>,
    date: Option<Box<dyn DateFormatter>>,
    base_dir: Option<PathBuf>,
}

impl Renderer {
    /// Create a renderer with the default style rules and no cover date.
    pub fn new(layouts: LayoutMap, probe: Box<dyn ImageProbe>) -> Self {
        Self {
            layouts,
            styles: StyleRules::default(),
            probe,
            date: None,
            base_dir: None,
        }
    }

    pub fn with_styles(mut self, styles: StyleRules) -> Self {
        self.styles = styles;
        self
    }

    /// Append the formatter's date as the last line of every cover title.
    pub fn with_date(mut self, date: Box<dyn DateFormatter>) -> Self {
        self.date = Some(date);
        self
    }

    /// Resolve relative image paths against `dir` instead of the working
    /// directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Render every slide of `deck`, in order.
    ///
    /// Image problems are logged and reported in the summary; only errors from
    /// the document itself abort the run.
    pub fn render<D>(&self, deck: &Deck, document: &mut D) -> Result<RenderSummary>
    where
        D: SlideDocument + ?Sized,
    {
        let mut summary = RenderSummary::default();

        for (index, block) in deck.iter().enumerate() {
            let template = self.resolve_template(block)?;
            let slide = document.add_slide(template)?;

            log::debug!(
                "Slide {}: '{}' with layout '{}' (template {})",
                index + 1,
                block.title_text().lines().next().unwrap_or_default(),
                block.layout.tag(),
                template
            );

            match &block.layout {
                Layout::Cover => self.render_cover(document, slide, block)?,
                Layout::Image => {
                    self.render_image(document, slide, block, index, &mut summary)?
                }
                Layout::Body(_) => self.render_body(document, slide, block)?,
            }

            summary.slides += 1;
        }

        Ok(summary)
    }

    fn resolve_template(&self, block: &SlideBlock) -> Result<usize> {
        let tag = block.layout.tag();
        if self.layouts.get(tag).is_none() {
            log::debug!("Layout '{}' not mapped, using '{}'", tag, CONTENT_LAYOUT);
        }
        self.layouts.resolve(tag).ok_or_else(|| {
            Error::Config(format!(
                "no template for layout '{}' and no '{}' fallback",
                tag, CONTENT_LAYOUT
            ))
        })
    }

    fn render_cover<D>(&self, document: &mut D, slide: SlideId, block: &SlideBlock) -> Result<()>
    where
        D: SlideDocument + ?Sized,
    {
        match &self.date {
            Some(date) => {
                let title = format!("{}\n{}", block.title_text(), date.format_today());
                document.set_title(slide, &title)
            }
            None => document.set_title(slide, block.title_text()),
        }
    }

    fn render_image<D>(
        &self,
        document: &mut D,
        slide: SlideId,
        block: &SlideBlock,
        index: usize,
        summary: &mut RenderSummary,
    ) -> Result<()>
    where
        D: SlideDocument + ?Sized,
    {
        document.set_title(slide, block.title_text())?;

        let Some(first) = block.images.first() else {
            return Ok(());
        };
        if block.images.len() > 1 {
            log::debug!(
                "Slide {}: using '{}', ignoring {} more images",
                index + 1,
                first,
                block.images.len() - 1
            );
        }

        let path = self.image_path(first);
        let Some(region) = document.picture_region(slide) else {
            log::warn!(
                "Slide {}: template has no picture region, skipping '{}'",
                index + 1,
                first
            );
            summary.image_failures.push(ImageFailure {
                slide: index,
                path,
                reason: "template has no picture region".to_string(),
            });
            return Ok(());
        };

        match self.place_image(document, slide, &path, region) {
            Ok(()) => summary.images += 1,
            Err(e) => {
                log::warn!(
                    "Slide {}: could not insert image {}: {}",
                    index + 1,
                    path.display(),
                    e
                );
                summary.image_failures.push(ImageFailure {
                    slide: index,
                    path,
                    reason: e.to_string(),
                });
            }
        }

        Ok(())
    }

    fn place_image<D>(
        &self,
        document: &mut D,
        slide: SlideId,
        path: &Path,
        region: Region,
    ) -> Result<()>
    where
        D: SlideDocument + ?Sized,
    {
        let (width, height) = self.probe.dimensions(path)?;
        let frame = region
            .fit(width, height)
            .ok_or_else(|| Error::Image(format!("{} has zero size", path.display())))?;
        document.insert_picture(slide, path, frame)
    }

    fn render_body<D>(&self, document: &mut D, slide: SlideId, block: &SlideBlock) -> Result<()>
    where
        D: SlideDocument + ?Sized,
    {
        let title = block.title_text();
        document.set_title(slide, title)?;

        if block.bullets.is_empty() {
            return Ok(());
        }
        if !document.has_body(slide) {
            log::warn!(
                "Template for '{}' has no body region, dropping {} bullets",
                title,
                block.bullets.len()
            );
            return Ok(());
        }

        let style = self.styles.style_for(title);
        let paragraphs: Vec<Paragraph> = block
            .bullets
            .iter()
            .map(|bullet| Paragraph::new(bullet.as_str()).with_style(style))
            .collect();

        document.set_body(slide, &paragraphs)
    }

    fn image_path(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
