//! Drawing conversion.
//!
//! Bulk filings ship drawings as single-page TIFF scans, often bilevel or
//! grayscale. The PDF embeds raw RGB samples, so every drawing is decoded
//! and normalized to 8-bit RGB here; the assembler never touches image
//! files.

use image::DynamicImage;
use log::warn;
use priorart_core::Drawing;
use std::path::Path;

/// A drawing decoded and normalized for embedding.
///
/// `rgb` holds tightly packed 8-bit RGB triples, row-major. Owned by the
/// assembler for the duration of layout and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// `width * height * 3` bytes of RGB samples.
    pub rgb: Vec<u8>,
}

/// Decode one drawing file and normalize it to 8-bit RGB.
///
/// # Errors
///
/// Returns the decoder error when the file is missing, unreadable, or not
/// a decodable image. Callers treat this as per-drawing and non-fatal.
pub fn convert_drawing(path: &Path) -> Result<RenderedImage, image::ImageError> {
    let decoded = image::open(path)?;
    let rgb = match decoded {
        DynamicImage::ImageRgb8(buffer) => buffer,
        other => other.to_rgb8(),
    };
    let (width, height) = rgb.dimensions();
    Ok(RenderedImage {
        width,
        height,
        rgb: rgb.into_raw(),
    })
}

/// Convert every drawing in a manifest.
///
/// The result is index-aligned with the manifest; a failed conversion
/// becomes `None` after a warning, and reconstruction continues — drawings
/// are supplementary, the claims and description are the document's
/// substance.
#[must_use]
pub fn convert_drawings(drawings: &[Drawing]) -> Vec<Option<RenderedImage>> {
    drawings
        .iter()
        .map(|drawing| match convert_drawing(&drawing.source_file) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(
                    "skipping drawing {} ({}): {e}",
                    drawing.figure_number,
                    drawing.source_file.display()
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_rgb_tiff(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let buffer = image::RgbImage::from_pixel(width, height, image::Rgb([200, 10, 10]));
        buffer.save(&path).unwrap();
        path
    }

    #[test]
    fn rgb_tiff_converts_without_color_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rgb_tiff(dir.path(), "D00001.TIF", 4, 3);

        let rendered = convert_drawing(&path).unwrap();
        assert_eq!((rendered.width, rendered.height), (4, 3));
        assert_eq!(rendered.rgb.len(), 4 * 3 * 3);
        assert_eq!(&rendered.rgb[..3], &[200, 10, 10]);
    }

    #[test]
    fn grayscale_tiff_is_normalized_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("D00002.TIF");
        image::GrayImage::from_pixel(2, 2, image::Luma([7]))
            .save(&path)
            .unwrap();

        let rendered = convert_drawing(&path).unwrap();
        assert_eq!(rendered.rgb.len(), 2 * 2 * 3);
        assert_eq!(&rendered.rgb[..3], &[7, 7, 7]);
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.TIF");
        std::fs::write(&path, b"not a tiff").unwrap();
        assert!(convert_drawing(&path).is_err());
    }

    #[test]
    fn convert_drawings_skips_failures_keeping_alignment() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_rgb_tiff(dir.path(), "D00001.TIF", 2, 2);
        let broken = dir.path().join("D00002.TIF");
        std::fs::write(&broken, b"garbage").unwrap();

        let drawings = vec![
            Drawing {
                figure_number: "00001".to_string(),
                source_file: good,
            },
            Drawing {
                figure_number: "00002".to_string(),
                source_file: broken,
            },
            Drawing {
                figure_number: "00003".to_string(),
                source_file: dir.path().join("missing.TIF"),
            },
        ];

        let images = convert_drawings(&drawings);
        assert_eq!(images.len(), 3);
        assert!(images[0].is_some());
        assert!(images[1].is_none());
        assert!(images[2].is_none());
    }
}
