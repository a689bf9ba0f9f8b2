use image::{DynamicImage, ImageDecoder, ImageReader};
use std::path::Path;
use tracing::debug;

use crate::core::processing::buffer::PixelBuffer;
use crate::error::Result;

/// File extensions picked up by directory processing.
pub const SUPPORTED_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "webp", "tif", "tiff", "bmp", "gif"];

/// Whether `path` names a file with one of [`SUPPORTED_EXTENSIONS`] (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Decode an image file and apply its EXIF orientation, so pixel coordinates
/// match what a viewer shows.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);

    debug!(
        "Decoded {:?}: {}x{} ({:?}, {:?})",
        path,
        img.width(),
        img.height(),
        img.color(),
        orientation
    );
    Ok(img)
}

/// Converts any decoded image to an 8-bit RGBA pixel buffer.
pub fn pixel_buffer_from_image(img: &DynamicImage) -> Result<PixelBuffer> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::new(width as usize, height as usize, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(is_supported_image(Path::new("a/b/photo.JPG")));
        assert!(is_supported_image(Path::new("scan.tiff")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn decodes_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.png");
        RgbImage::from_pixel(5, 3, Rgb([10, 20, 30])).save(&path).unwrap();

        let img = open_image(&path).unwrap();
        let pixels = pixel_buffer_from_image(&img).unwrap();
        assert_eq!((pixels.width(), pixels.height()), (5, 3));
        assert_eq!(pixels.rgb(4, 2), (10, 20, 30));
        assert_eq!(pixels.get(0, 0, 3), 255);
    }
}
