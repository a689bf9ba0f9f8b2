use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::processing::buffer::PixelBuffer;
use crate::core::processing::score::Crop;
use crate::error::{Error, Result};

/// Long side the analysis copy is reduced to before searching.
pub const PRESCALE_TARGET: f64 = 256.0;

/// Integral crop rectangle in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CropRect {
    /// Maps an analysis-space crop back to the source image, undoing `prescale`.
    ///
    /// Coordinates are truncated; the rectangle is kept inside
    /// `source_cols x source_rows` and at least one pixel wide and tall.
    pub fn from_analysis(crop: &Crop, prescale: f64, source_cols: usize, source_rows: usize) -> Self {
        let x = ((crop.x as f64 / prescale).floor() as usize).min(source_cols.saturating_sub(1));
        let y = ((crop.y as f64 / prescale).floor() as usize).min(source_rows.saturating_sub(1));
        let width = ((crop.width / prescale).floor() as usize)
            .min(source_cols - x)
            .max(1);
        let height = ((crop.height / prescale).floor() as usize)
            .min(source_rows - y)
            .max(1);
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Factor that brings the shorter side down to about 256 pixels; 1.0 for small images.
pub fn calculate_prescale(cols: usize, rows: usize) -> f64 {
    let factor = f64::max(PRESCALE_TARGET / cols as f64, PRESCALE_TARGET / rows as f64);
    factor.min(1.0)
}

/// Largest `cols x rows` box with the source aspect that fits the target box.
pub fn calculate_fit_dimensions(
    src_cols: usize,
    src_rows: usize,
    target_cols: usize,
    target_rows: usize,
) -> (usize, usize) {
    let scale = f64::min(
        target_cols as f64 / src_cols as f64,
        target_rows as f64 / src_rows as f64,
    );
    let cols = ((src_cols as f64 * scale).round() as usize).clamp(1, target_cols.max(1));
    let rows = ((src_rows as f64 * scale).round() as usize).clamp(1, target_rows.max(1));
    (cols, rows)
}

fn lanczos_options() -> ResizeOptions {
    ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3))
}

pub fn resize_rgba_image(
    data: &[u8],
    original_cols: usize,
    original_rows: usize,
    target_cols: usize,
    target_rows: usize,
) -> Result<Vec<u8>> {
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        original_cols as u32,
        original_rows as u32,
        data.to_vec(),
        PixelType::U8x4,
    )
    .map_err(Error::external)?;
    let mut dst_image = Image::new(target_cols as u32, target_rows as u32, PixelType::U8x4);
    resizer
        .resize(&src_image, &mut dst_image, &lanczos_options())
        .map_err(Error::external)?;

    Ok(dst_image.into_vec())
}

/// Crops `rect` out of the RGBA image and resamples it to `target_cols x target_rows`
/// in a single pass.
pub fn crop_and_resize_rgba(
    data: &[u8],
    original_cols: usize,
    original_rows: usize,
    rect: &CropRect,
    target_cols: usize,
    target_rows: usize,
) -> Result<Vec<u8>> {
    let options = lanczos_options().crop(
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
    );
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        original_cols as u32,
        original_rows as u32,
        data.to_vec(),
        PixelType::U8x4,
    )
    .map_err(Error::external)?;
    let mut dst_image = Image::new(target_cols as u32, target_rows as u32, PixelType::U8x4);
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(Error::external)?;

    debug!(
        "Cropped {}x{}+{}+{} -> {}x{}",
        rect.width, rect.height, rect.x, rect.y, target_cols, target_rows
    );
    Ok(dst_image.into_vec())
}

/// Downscales `pixels` for analysis when it is larger than needed.
///
/// Returns the buffer to analyze and the factor applied (1.0 when untouched).
pub fn prescale_pixels(pixels: &PixelBuffer) -> Result<(PixelBuffer, f64)> {
    let cols = pixels.width();
    let rows = pixels.height();
    let factor = calculate_prescale(cols, rows);
    if factor >= 1.0 {
        return Ok((pixels.clone(), 1.0));
    }

    let new_cols = ((cols as f64 * factor).floor() as usize).max(1);
    let new_rows = ((rows as f64 * factor).floor() as usize).max(1);
    info!(
        "Prescaling {}x{} -> {}x{} (factor {:.4}) for analysis",
        cols, rows, new_cols, new_rows, factor
    );
    let resized = resize_rgba_image(pixels.as_slice(), cols, rows, new_cols, new_rows)?;
    Ok((PixelBuffer::new(new_cols, new_rows, resized)?, factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prescale_targets_short_side() {
        assert_eq!(calculate_prescale(200, 100), 1.0);
        assert_eq!(calculate_prescale(1024, 512), 0.5);
        assert_eq!(calculate_prescale(2048, 4096), 0.125);
    }

    #[test]
    fn fit_preserves_aspect() {
        assert_eq!(calculate_fit_dimensions(400, 200, 100, 100), (100, 50));
        assert_eq!(calculate_fit_dimensions(100, 300, 90, 90), (30, 90));
        assert_eq!(calculate_fit_dimensions(50, 50, 10, 20), (10, 10));
    }

    #[test]
    fn crop_rect_undoes_prescale() {
        let crop = Crop::new(16, 8, 128.0, 64.5);
        let rect = CropRect::from_analysis(&crop, 0.5, 1000, 1000);
        assert_eq!(
            rect,
            CropRect {
                x: 32,
                y: 16,
                width: 256,
                height: 129
            }
        );
    }

    #[test]
    fn crop_rect_stays_inside_source() {
        let crop = Crop::new(100, 0, 156.0, 100.0);
        let rect = CropRect::from_analysis(&crop, 0.25, 1023, 400);
        assert_eq!(rect.x, 400);
        assert_eq!(rect.x + rect.width, 1023);
        assert_eq!(rect.height, 400);
    }

    #[test]
    fn prescale_leaves_small_images() {
        let pixels = PixelBuffer::filled(40, 30, [1, 2, 3, 255]).unwrap();
        let (out, factor) = prescale_pixels(&pixels).unwrap();
        assert_eq!(factor, 1.0);
        assert_eq!(out, pixels);
    }

    #[test]
    fn prescale_shrinks_large_images() {
        let pixels = PixelBuffer::filled(1024, 600, [10, 200, 30, 255]).unwrap();
        let (out, factor) = prescale_pixels(&pixels).unwrap();
        // max(0.25, 0.4267) = 0.4267
        assert!((factor - 256.0 / 600.0).abs() < 1e-12);
        assert_eq!(out.width(), (1024.0 * factor).floor() as usize);
        assert_eq!(out.height(), (600.0 * factor).floor() as usize);
        assert!(out.height() >= 255);
    }

    #[test]
    fn crop_and_resize_produces_target_size() {
        let pixels = PixelBuffer::filled(64, 48, [255, 0, 0, 255]).unwrap();
        let rect = CropRect {
            x: 8,
            y: 4,
            width: 32,
            height: 32,
        };
        let out = crop_and_resize_rgba(pixels.as_slice(), 64, 48, &rect, 16, 16).unwrap();
        assert_eq!(out.len(), 16 * 16 * 4);
        assert_eq!(&out[0..4], &[255, 0, 0, 255]);
    }
}
