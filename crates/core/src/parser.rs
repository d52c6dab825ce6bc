//! Markdown-like slide outline parser.
//!
//! The input is a sequence of segments separated by lines of three or more
//! hyphens. Each segment becomes at most one [`SlideBlock`]:
//!
//! ```text
//! # Agenda
//! - Introducción
//! - Resultados
//! ---
//! # Arquitectura [layout: imagen]
//! diagrams/arquitectura.png
//! ```
//!
//! Only the first `#` heading of a segment sets the title and layout. Lines
//! ending in an image extension are image references; every other non-blank
//! line is a bullet. Segments without a title are dropped.

use crate::types::{Deck, Layout, SlideBlock};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Image extensions recognized when no configuration overrides them.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// A segment delimiter: three or more hyphens and nothing else.
static DELIMITER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-{3,}\s*$").unwrap());

/// `Title text [layout: name]`, tolerating a missing closing bracket.
static LAYOUT_DIRECTIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>.*?)\[layout:(?P<tag>.*?)\]*\s*$").unwrap()
});

/// Parser settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Case-sensitive suffixes that mark a line as an image reference.
    pub image_extensions: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Parser turning outline text into a [`Deck`].
#[derive(Debug, Clone, Default)]
pub struct SlideParser {
    options: ParserOptions,
}

/// Parse `text` with default options.
pub fn parse(text: &str) -> Deck {
    SlideParser::new().parse(text)
}

/// Title and layout taken from a segment's first heading.
#[derive(Debug, PartialEq)]
struct Heading {
    title: Option<String>,
    layout: Option<Layout>,
}

impl SlideParser {
    /// Create a parser with the default image extensions.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parse a whole document. Never fails; malformed segments are skipped.
    pub fn parse(&self, text: &str) -> Deck {
        let text: String = text.nfc().collect();
        let mut deck = Deck::new();

        let segments = split_segments(&text);
        let segment_count = segments.len();

        for segment in segments {
            if let Some(block) = self.parse_segment(&segment) {
                deck.push(block);
            }
        }

        log::debug!(
            "Parsed {} slides from {} segments",
            deck.len(),
            segment_count
        );

        deck
    }

    /// Parse one segment's raw lines.
    fn parse_segment(&self, raw_lines: &[&str]) -> Option<SlideBlock> {
        let lines: Vec<&str> = raw_lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            return None;
        }

        let mut heading: Option<(usize, Heading)> = None;
        let mut bullets = Vec::new();
        let mut images = Vec::new();

        for (idx, line) in lines.iter().copied().enumerate() {
            let content = match strip_heading_marker(line) {
                Some(text) if heading.is_none() => {
                    heading = Some((idx, parse_heading(text)));
                    continue;
                }
                Some(text) => text.trim(),
                None => line,
            };

            if self.is_image(content) {
                let path = strip_bullet_marker(content);
                if !path.is_empty() {
                    images.push(path.to_string());
                }
            } else {
                let bullet = strip_bullet_marker(content);
                if !bullet.is_empty() {
                    bullets.push(bullet.to_string());
                }
            }
        }

        let (heading_idx, heading) = heading?;
        let layout = heading.layout.unwrap_or_default();

        let title = if layout.is_cover() {
            bullets.clear();
            images.clear();
            cover_title(heading.title, &lines, heading_idx)
        } else {
            heading.title
        };

        match title {
            Some(title) => Some(SlideBlock {
                title: Some(title),
                bullets,
                images,
                layout,
            }),
            None => {
                log::debug!("Dropping segment without a title: {:?}", lines.first());
                None
            }
        }
    }

    fn is_image(&self, line: &str) -> bool {
        self.options
            .image_extensions
            .iter()
            .any(|ext| line.ends_with(ext.as_str()))
    }
}

/// Split text into segments at delimiter lines.
fn split_segments(text: &str) -> Vec<Vec<&str>> {
    let mut segments = vec![Vec::new()];

    for line in text.lines() {
        if DELIMITER_REGEX.is_match(line) {
            segments.push(Vec::new());
        } else if let Some(current) = segments.last_mut() {
            current.push(line);
        }
    }

    segments
}

/// Text after the leading `#` run, or `None` for a non-heading line.
fn strip_heading_marker(line: &str) -> Option<&str> {
    if line.starts_with('#') {
        Some(line.trim_start_matches('#'))
    } else {
        None
    }
}

/// Remove a leading `-` bullet marker and surrounding whitespace.
fn strip_bullet_marker(line: &str) -> &str {
    line.trim_start_matches('-').trim()
}

/// Split heading text into title and optional layout directive.
fn parse_heading(text: &str) -> Heading {
    let (title, tag) = match LAYOUT_DIRECTIVE_REGEX.captures(text) {
        Some(caps) => (
            caps.name("title").map_or("", |m| m.as_str()),
            caps.name("tag").map(|m| m.as_str().trim()),
        ),
        None => (text, None),
    };

    let title = title.trim();

    Heading {
        title: (!title.is_empty()).then(|| title.to_string()),
        layout: tag
            .filter(|tag| !tag.is_empty())
            .map(Layout::from_tag),
    }
}

/// A cover title is the heading text followed by the non-blank lines after
/// the heading line, one per line. Lines before the heading are not part of
/// the cover.
fn cover_title(heading_title: Option<String>, lines: &[&str], heading_idx: usize) -> Option<String> {
    let following = lines.get(heading_idx + 1..).unwrap_or_default();
    let parts: Vec<&str> = heading_title
        .as_deref()
        .into_iter()
        .chain(following.iter().copied())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{COVER_LAYOUT, IMAGE_LAYOUT};

    #[test]
    fn test_plain_segments_default_to_content() {
        let text = "# Uno\n- a\n- b\nfoto.png\n---\n# Dos\n- c\n- d\nx.jpg\n";
        let deck = parse(text);

        assert_eq!(deck.len(), 2);
        for (block, title) in deck.iter().zip(["Uno", "Dos"]) {
            assert_eq!(block.title.as_deref(), Some(title));
            assert_eq!(block.layout.tag(), "contenido");
            assert_eq!(block.bullets.len(), 2);
            assert_eq!(block.images.len(), 1);
        }
        assert_eq!(deck.slides()[0].bullets, vec!["a", "b"]);
        assert_eq!(deck.slides()[1].images, vec!["x.jpg"]);
    }

    #[test]
    fn test_blank_lines_never_become_bullets() {
        let deck = parse("# T\n\n   \n- a\n\n-\nb\n");
        assert_eq!(deck.slides()[0].bullets, vec!["a", "b"]);
    }

    #[test]
    fn test_untitled_segments_are_dropped() {
        let text = "- orphan bullet\norphan.png\n---\n# Kept\n- x\n---\n\n\n---\n#\n- empty title\n";
        let deck = parse(text);

        assert_eq!(deck.len(), 1);
        assert_eq!(deck.slides()[0].title.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_deck_never_exceeds_segment_count() {
        let inputs = [
            "",
            "---",
            "# a\n---\n# b\n---\n",
            "text\n----\n# t\n-----\nmore",
            "# only\n# headings\n---\n##\n",
        ];
        for input in inputs {
            let deck = parse(input);
            assert!(deck.len() <= split_segments(input).len());
            assert!(deck
                .iter()
                .all(|b| b.title.as_deref().map_or(false, |t| !t.is_empty())));
        }
    }

    #[test]
    fn test_delimiter_needs_three_hyphens_alone() {
        let deck = parse("# A\n-- not a delimiter\n--- \n# B\n");
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slides()[0].bullets, vec!["not a delimiter"]);
    }

    #[test]
    fn test_image_layout_scenario() {
        let deck = parse("# Diagram [layout: imagen]\ndiagram.png");

        assert_eq!(deck.len(), 1);
        let block = &deck.slides()[0];
        assert_eq!(block.title.as_deref(), Some("Diagram"));
        assert_eq!(block.layout, Layout::Image);
        assert_eq!(block.layout.tag(), IMAGE_LAYOUT);
        assert_eq!(block.images, vec!["diagram.png"]);
        assert!(block.bullets.is_empty());
    }

    #[test]
    fn test_unknown_layout_tag_is_kept() {
        let deck = parse("# Datos [layout: foo]\n- uno");
        assert_eq!(deck.slides()[0].layout.tag(), "foo");
        assert_eq!(deck.slides()[0].title.as_deref(), Some("Datos"));
    }

    #[test]
    fn test_malformed_directive_is_permissive() {
        let deck = parse("# Datos [layout: tabla ancha\n- uno");
        assert_eq!(deck.slides()[0].layout.tag(), "tabla ancha");
        assert_eq!(deck.slides()[0].title.as_deref(), Some("Datos"));

        let deck = parse("# Vacío [layout:]\n- uno");
        assert_eq!(deck.slides()[0].layout.tag(), "contenido");
    }

    #[test]
    fn test_cover_collects_lines_into_title() {
        let text = "# Informe anual [layout: portada]\nSubtítulo\n\n- no es viñeta\nlogo.png\n";
        let deck = parse(text);

        let block = &deck.slides()[0];
        assert_eq!(block.layout.tag(), COVER_LAYOUT);
        assert_eq!(
            block.title.as_deref(),
            Some("Informe anual\nSubtítulo\n- no es viñeta\nlogo.png")
        );
        assert!(block.bullets.is_empty());
        assert!(block.images.is_empty());
    }

    #[test]
    fn test_cover_keeps_order_after_heading() {
        let deck = parse("Preámbulo\n# Informe [layout: portada]\nSubtítulo\n");

        let block = &deck.slides()[0];
        assert_eq!(block.layout.tag(), COVER_LAYOUT);
        assert_eq!(block.title.as_deref(), Some("Informe\nSubtítulo"));
        assert!(block.bullets.is_empty());
    }

    #[test]
    fn test_cover_without_heading_text() {
        let deck = parse("# [layout: portada]\nSolo subtítulo\n");
        assert_eq!(deck.slides()[0].title.as_deref(), Some("Solo subtítulo"));

        let deck = parse("# [layout: portada]\n");
        assert!(deck.is_empty());
    }

    #[test]
    fn test_only_first_heading_is_authoritative() {
        let deck = parse("# Primero\n## Segundo [layout: imagen]\n- a\n### foto.png\n");

        let block = &deck.slides()[0];
        assert_eq!(block.title.as_deref(), Some("Primero"));
        assert_eq!(block.layout.tag(), "contenido");
        assert_eq!(block.bullets, vec!["Segundo [layout: imagen]", "a"]);
        assert_eq!(block.images, vec!["foto.png"]);
    }

    #[test]
    fn test_image_before_bullet_and_case_sensitive() {
        let deck = parse("# T\n- captura.png\nFOTO.PNG\nnotas sobre png\n");

        let block = &deck.slides()[0];
        assert_eq!(block.images, vec!["captura.png"]);
        assert_eq!(block.bullets, vec!["FOTO.PNG", "notas sobre png"]);
    }

    #[test]
    fn test_custom_image_extensions() {
        let parser = SlideParser::with_options(ParserOptions {
            image_extensions: vec![".svg".to_string()],
        });
        let deck = parser.parse("# T\nflujo.svg\nfoto.png\n");

        assert_eq!(deck.slides()[0].images, vec!["flujo.svg"]);
        assert_eq!(deck.slides()[0].bullets, vec!["foto.png"]);
    }

    #[test]
    fn test_duplicate_titles_are_kept() {
        let deck = parse("# Igual\n---\n# Igual\n");
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_crlf_and_decomposed_accents() {
        let deck = parse("# Introduccio\u{301}n\r\n- uno\r\n");

        let block = &deck.slides()[0];
        assert_eq!(block.title.as_deref(), Some("Introducci\u{f3}n"));
        assert_eq!(block.bullets, vec!["uno"]);
    }

    #[test]
    fn test_parse_heading() {
        assert_eq!(
            parse_heading(" Título [layout: imagen]"),
            Heading {
                title: Some("Título".to_string()),
                layout: Some(Layout::Image),
            }
        );
        assert_eq!(
            parse_heading("  "),
            Heading {
                title: None,
                layout: None,
            }
        );
    }
}
