//! High-level, ergonomic library API: find the best crop for an image, render
//! thumbnails to files or in-memory buffers, and batch helpers for directories.
//! Prefer these entrypoints over the low-level processing modules when
//! integrating smartthumb.
use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::params::{Properties, SearchGeometry, ThumbnailParams};
use crate::core::processing::buffer::{AnalysisBuffer, PixelBuffer};
use crate::core::processing::padding::pad_to_extent;
use crate::core::processing::pipeline::find_best_crop_with_features;
use crate::core::processing::resize::{
    CropRect, calculate_fit_dimensions, crop_and_resize_rgba, prescale_pixels,
};
use crate::core::processing::save::save_thumbnail;
use crate::core::processing::score::{Crop, ScoreBreakdown};
use crate::core::processing::visualize::render_analysis;
use crate::error::{Error, Result};
use crate::io::writers::metadata::CropMetadata;
use crate::io::{is_supported_image, open_image, pixel_buffer_from_image};
use crate::types::{FitMode, OutputFormat};

/// Winning crop of one image, in source pixels and in analysis coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropResult {
    pub crop: CropRect,
    pub analysis_crop: Crop,
    pub score: ScoreBreakdown,
    /// Factor the analysis copy was resampled by (1.0 when not prescaled)
    pub prescale: f64,
    pub source_width: usize,
    pub source_height: usize,
}

/// Result of in-memory thumbnail rendering
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: usize,
    pub height: usize,
    /// Interleaved RGBA, row-major
    pub rgba: Vec<u8>,
    pub crop: CropResult,
}

fn locate_crop(
    pixels: &PixelBuffer,
    props: &Properties,
    prescale: bool,
) -> Result<(CropResult, AnalysisBuffer)> {
    let (source_width, source_height) = (pixels.width(), pixels.height());
    let geometry = SearchGeometry::derive(props, source_width, source_height);

    let scaled = if prescale {
        Some(prescale_pixels(pixels)?)
    } else {
        None
    };
    let (input, factor) = match &scaled {
        Some((buffer, factor)) => (buffer, *factor),
        None => (pixels, 1.0),
    };

    let (analysis_crop, features) =
        find_best_crop_with_features(props, &geometry.prescaled(factor), input)?;
    let crop = CropRect::from_analysis(&analysis_crop, factor, source_width, source_height);
    info!(
        "Crop in source pixels: {}x{}+{}+{}",
        crop.width, crop.height, crop.x, crop.y
    );

    Ok((
        CropResult {
            crop,
            analysis_crop,
            score: analysis_crop.score,
            prescale: factor,
            source_width,
            source_height,
        },
        features,
    ))
}

/// Find the best crop for a decoded image.
pub fn analyze_image(img: &DynamicImage, props: &Properties, prescale: bool) -> Result<CropResult> {
    let pixels = pixel_buffer_from_image(img)?;
    locate_crop(&pixels, props, prescale).map(|(result, _)| result)
}

/// Decode `path` and find its best crop without rendering anything.
pub fn find_crop_for_path(path: &Path, props: &Properties, prescale: bool) -> Result<CropResult> {
    let img = open_image(path)?;
    analyze_image(&img, props, prescale)
}

fn render_crop(
    pixels: &PixelBuffer,
    rect: &CropRect,
    target_cols: usize,
    target_rows: usize,
    fit: FitMode,
) -> Result<Vec<u8>> {
    let (cols, rows) = (pixels.width(), pixels.height());
    match fit {
        FitMode::Stretch => {
            crop_and_resize_rgba(pixels.as_slice(), cols, rows, rect, target_cols, target_rows)
        }
        FitMode::Extent => {
            let (fit_cols, fit_rows) =
                calculate_fit_dimensions(rect.width, rect.height, target_cols, target_rows);
            let fitted = crop_and_resize_rgba(pixels.as_slice(), cols, rows, rect, fit_cols, fit_rows)?;
            let (padded, _, _) = pad_to_extent(&fitted, fit_cols, fit_rows, target_cols, target_rows);
            Ok(padded)
        }
    }
}

fn build_thumbnail(input: &Path, params: &ThumbnailParams) -> Result<(Thumbnail, AnalysisBuffer)> {
    params.validate()?;
    let img = open_image(input)?;
    let pixels = pixel_buffer_from_image(&img)?;

    let (crop, features) = locate_crop(&pixels, &params.properties, params.prescale)?;
    let width = params.properties.resize_width as usize;
    let height = params.properties.resize_height as usize;
    let rgba = render_crop(&pixels, &crop.crop, width, height, params.fit)?;

    Ok((
        Thumbnail {
            width,
            height,
            rgba,
            crop,
        },
        features,
    ))
}

/// Render a thumbnail of `input` to an in-memory RGBA buffer (no disk output)
pub fn thumbnail_to_buffer(input: &Path, params: &ThumbnailParams) -> Result<Thumbnail> {
    build_thumbnail(input, params).map(|(thumbnail, _)| thumbnail)
}

/// Path of the analysis rendering written next to `output` in debug mode.
pub fn analysis_output_path(output: &Path) -> PathBuf {
    output.with_extension("analysis.png")
}

/// Render a thumbnail of `input` into `output` using `params`.
///
/// Also writes the JSON sidecar and the analysis image when requested.
pub fn thumbnail_to_path(input: &Path, output: &Path, params: &ThumbnailParams) -> Result<CropResult> {
    let (thumbnail, features) = build_thumbnail(input, params)?;
    let result = thumbnail.crop;

    let metadata = CropMetadata::new(
        input,
        result.source_width,
        result.source_height,
        thumbnail.width,
        thumbnail.height,
        result.crop,
        &result.analysis_crop,
        result.prescale,
        &params.properties,
    );
    save_thumbnail(
        &thumbnail.rgba,
        thumbnail.width,
        thumbnail.height,
        output,
        params.format,
        params.quality,
        Some(&metadata),
        params.sidecar,
    )?;

    if params.debug_output {
        let debug_path = analysis_output_path(output);
        save_thumbnail(
            &render_analysis(&features),
            features.width(),
            features.height(),
            &debug_path,
            OutputFormat::PNG,
            params.quality,
            None,
            false,
        )?;
        info!("Wrote analysis image: {:?}", debug_path);
    }
    Ok(result)
}

/// Batch processing report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Entries of `input_dir` in name order (files and directories alike).
pub fn iterate_directory(input_dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(input_dir).map_err(Error::from)? {
        let entry = entry.map_err(Error::from)?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths.into_iter())
}

/// Render every supported image in `input_dir` into `output_dir` as
/// `<stem>.<ext>`, using `params`.
/// If `continue_on_error` is true, errors are counted in the report and processing continues;
/// otherwise, the first error is returned.
pub fn process_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    params: &ThumbnailParams,
    continue_on_error: bool,
) -> Result<BatchReport> {
    params.validate()?;
    std::fs::create_dir_all(output_dir).map_err(Error::from)?;

    let mut report = BatchReport::default();

    for path in iterate_directory(input_dir)? {
        let stem = match path.file_stem() {
            Some(stem) if path.is_file() && is_supported_image(&path) => stem.to_string_lossy(),
            _ => {
                warn!("Skipping unsupported entry: {:?}", path);
                report.skipped += 1;
                continue;
            }
        };
        let output_path = output_dir.join(format!("{}.{}", stem, params.format.extension()));

        info!("Processing: {:?} -> {:?}", path, output_path);
        match thumbnail_to_path(&path, &output_path, params) {
            Ok(_) => report.processed += 1,
            Err(e) => {
                warn!("Error processing {:?}: {}", path, e);
                report.errors += 1;
                if !continue_on_error {
                    return Err(e);
                }
            }
        }
    }

    info!(
        "Batch complete: processed={}, skipped={}, errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(report)
}
