//! PPTX (Office Open XML) backend that appends rendered slides to a template.
//!
//! A template is a ZIP archive of XML parts. Its first slide master's layouts
//! form the catalog that layout indexes refer to.

pub mod document;
pub mod media;
pub mod package;
pub mod slide;
pub mod template;

#[cfg(test)]
mod test_support;

pub use document::PptxDocument;
pub use media::ImageDimensions;
pub use template::TemplateCatalog;
