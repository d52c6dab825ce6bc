//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a template, rendering slides, or
/// writing the output package.
///
/// Parsing markdown never produces one of these: malformed input degrades
/// into possibly-empty slide blocks instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read, or write a file.
    #[error("Failed to read or write file: {0}")]
    IoError(#[from] std::io::Error),

    /// The template is unusable or a requested layout is not in its catalog.
    #[error("Template error: {0}")]
    Template(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// An image could not be opened, decoded, or embedded.
    #[error("Image error: {0}")]
    Image(String),

    /// The layout/style configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}
