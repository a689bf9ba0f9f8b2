use rayon::prelude::*;
use tracing::debug;

use crate::core::params::{MAX_SCALE_COUNT, Properties, SearchGeometry};
use crate::core::processing::buffer::ReducedBuffer;
use crate::core::processing::score::{Crop, score};
use crate::error::{Error, Result};

/// Scales visited by the search, from `max_scale` down to `min_scale`.
///
/// Uses repeated subtraction so the sequence (and its float drift) matches
/// the reference scan order exactly.
pub fn scale_sequence(min_scale: f64, max_scale: f64, scale_step: f64) -> Vec<f64> {
    let mut scales = Vec::new();
    if scale_step <= 0.0 {
        return scales;
    }
    let mut scale = max_scale;
    while scale >= min_scale && scales.len() < MAX_SCALE_COUNT {
        scales.push(scale);
        let next = scale - scale_step;
        if next >= scale {
            break;
        }
        scale = next;
    }
    scales
}

/// Every candidate at one scale, in scan order (rows top to bottom, then columns).
pub fn candidates_at_scale(
    geometry: &SearchGeometry,
    step: usize,
    scale: f64,
    image_width: usize,
    image_height: usize,
) -> Vec<Crop> {
    let width = geometry.crop_width as f64 * scale;
    let height = geometry.crop_height as f64 * scale;
    let step = step.max(1);

    let mut crops = Vec::new();
    let mut y = 0usize;
    while y as f64 + height <= image_height as f64 {
        let mut x = 0usize;
        while x as f64 + width <= image_width as f64 {
            crops.push(Crop::new(x, y, width, height));
            x += step;
        }
        y += step;
    }
    crops
}

/// Picks the crop with the strictly greatest total.
///
/// Ties keep the earliest candidate in iteration order.
pub fn select_best<I>(crops: I) -> Option<Crop>
where
    I: IntoIterator<Item = Crop>,
{
    let mut top_score = f64::NEG_INFINITY;
    let mut top_crop = None;
    for crop in crops {
        if crop.score.total > top_score {
            top_score = crop.score.total;
            top_crop = Some(crop);
        }
    }
    top_crop
}

/// Exhaustive multi-scale search over an `image_width x image_height` analysis grid.
///
/// Scales are scored in parallel; the per-scale winners are reduced in scan
/// order with [`select_best`], so the outcome is identical to a sequential scan.
pub fn search_best_crop(
    props: &Properties,
    geometry: &SearchGeometry,
    reduced: &ReducedBuffer,
    image_width: usize,
    image_height: usize,
) -> Result<Crop> {
    let degenerate = || Error::DegenerateSearch {
        image_width,
        image_height,
        crop_width: geometry.crop_width,
        crop_height: geometry.crop_height,
        min_scale: geometry.min_scale,
        max_scale: geometry.max_scale,
    };

    if geometry.crop_width == 0 || geometry.crop_height == 0 {
        return Err(degenerate());
    }
    // Explicit geometry skips property validation.
    let scales_valid = |s: f64| s.is_finite() && s > 0.0;
    if !scales_valid(geometry.min_scale) || !scales_valid(geometry.max_scale) {
        return Err(degenerate());
    }

    let scales = scale_sequence(geometry.min_scale, geometry.max_scale, props.scale_step);
    let step = props.step as usize;

    let winners: Vec<Option<Crop>> = scales
        .par_iter()
        .map(|&scale| {
            let scored = candidates_at_scale(geometry, step, scale, image_width, image_height)
                .into_iter()
                .map(|mut crop| {
                    crop.score = score(props, reduced, &crop);
                    crop
                });
            let best = select_best(scored);
            if let Some(c) = &best {
                debug!(
                    "scale {:.3}: best {}x{}+{}+{} total={:.6}",
                    scale, c.width, c.height, c.x, c.y, c.score.total
                );
            }
            best
        })
        .collect();

    select_best(winners.into_iter().flatten()).ok_or_else(degenerate)
}
