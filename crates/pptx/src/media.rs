//! Image metadata and media types via the `image` crate.

use deck_core::{Error, ImageProbe, Result};
use image::ImageFormat;
use std::path::Path;

/// Reads pixel dimensions from image headers without decoding pixel data.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDimensions;

impl ImageProbe for ImageDimensions {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        image::image_dimensions(path)
            .map_err(|e| Error::Image(format!("{}: {}", path.display(), e)))
    }
}

/// File extension and content type for embedding `data` as a media part.
pub(crate) fn media_type(data: &[u8]) -> Result<(&'static str, &'static str)> {
    let format = image::guess_format(data)
        .map_err(|e| Error::Image(format!("Unrecognized image data: {}", e)))?;

    match format {
        ImageFormat::Png => Ok(("png", "image/png")),
        ImageFormat::Jpeg => Ok(("jpeg", "image/jpeg")),
        ImageFormat::Gif => Ok(("gif", "image/gif")),
        ImageFormat::Bmp => Ok(("bmp", "image/bmp")),
        ImageFormat::Tiff => Ok(("tiff", "image/tiff")),
        other => Err(Error::Image(format!(
            "Unsupported image format for slides: {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_of_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(6, 2).save(&path).unwrap();

        assert_eq!(ImageDimensions.dimensions(&path).unwrap(), (6, 2));
    }

    #[test]
    fn test_missing_file_is_image_error() {
        let err = ImageDimensions
            .dimensions(Path::new("/nonexistent/missing.png"))
            .unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }

    #[test]
    fn test_media_type_from_magic() {
        assert_eq!(
            media_type(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap(),
            ("png", "image/png")
        );
        assert_eq!(
            media_type(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap(),
            ("jpeg", "image/jpeg")
        );
        assert!(media_type(b"not an image").is_err());
    }
}
