use tracing::info;

use crate::core::params::{Properties, SearchGeometry};
use crate::core::processing::buffer::{AnalysisBuffer, PixelBuffer, ReducedBuffer};
use crate::core::processing::detectors::detect_features;
use crate::core::processing::downsample::downsample;
use crate::core::processing::score::Crop;
use crate::core::processing::search::search_best_crop;
use crate::error::Result;

/// Feature detection followed by block reduction.
pub fn analyze_pixels(props: &Properties, input: &PixelBuffer) -> (AnalysisBuffer, ReducedBuffer) {
    let features = detect_features(props, input);
    let reduced = downsample(&features, props.score_down_sample as usize);
    (features, reduced)
}

/// Best crop for `input`, with the crop size derived from the buffer's own
/// dimensions and the target size in `props`.
pub fn find_best_crop(props: &Properties, input: &PixelBuffer) -> Result<Crop> {
    let geometry = SearchGeometry::derive(props, input.width(), input.height());
    find_best_crop_with_geometry(props, &geometry, input)
}

/// Best crop for `input` using a precomputed geometry (e.g. one scaled for a
/// prescaled buffer).
pub fn find_best_crop_with_geometry(
    props: &Properties,
    geometry: &SearchGeometry,
    input: &PixelBuffer,
) -> Result<Crop> {
    find_best_crop_with_features(props, geometry, input).map(|(crop, _)| crop)
}

/// Like [`find_best_crop_with_geometry`], also returning the full-resolution
/// feature maps for inspection.
pub fn find_best_crop_with_features(
    props: &Properties,
    geometry: &SearchGeometry,
    input: &PixelBuffer,
) -> Result<(Crop, AnalysisBuffer)> {
    props.validate()?;
    info!(
        "Searching {}x{} buffer: crop {}x{}, scales {:.3}..={:.3}, step {}",
        input.width(),
        input.height(),
        geometry.crop_width,
        geometry.crop_height,
        geometry.min_scale,
        geometry.max_scale,
        props.step
    );

    let (features, reduced) = analyze_pixels(props, input);
    let crop = search_best_crop(props, geometry, &reduced, input.width(), input.height())?;

    info!(
        "Top crop: {:.1}x{:.1}+{}+{} total={:.6}",
        crop.width, crop.height, crop.x, crop.y, crop.score.total
    );
    Ok((crop, features))
}
