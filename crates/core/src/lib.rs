//! Core slide model, markdown outline parser, and layout-dispatch renderer
//! for markdown-to-PowerPoint generation.

pub mod config;
pub mod date;
pub mod error;
pub mod parser;
pub mod render;
pub mod style;
pub mod types;

pub use config::DeckConfig;
pub use date::{DateFormatter, FixedDate, SpanishLongDate};
pub use error::{Error, Result};
pub use parser::{parse, ParserOptions, SlideParser};
pub use render::{ImageFailure, ImageProbe, RenderSummary, Renderer, SlideDocument};
pub use style::{StyleRule, StyleRules};
pub use types::{
    Deck, Layout, LayoutMap, Paragraph, Region, SlideBlock, SlideId, TextStyle, CONTENT_LAYOUT,
    COVER_LAYOUT, IMAGE_LAYOUT,
};
