use serde::{Deserialize, Serialize};

use crate::core::params::Properties;
use crate::core::processing::buffer::ReducedBuffer;
use crate::types::AnalysisChannel;

/// Per-feature sums of a candidate and its weighted, area-normalized total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub detail: f64,
    pub saturation: f64,
    pub skin: f64,
    pub boost: f64,
    pub total: f64,
}

/// Candidate or winning crop in analysis coordinates.
///
/// `x`/`y` are multiples of the search step; `width`/`height` are the base
/// crop size times the scale and may be fractional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub x: usize,
    pub y: usize,
    pub width: f64,
    pub height: f64,
    pub score: ScoreBreakdown,
}

impl Crop {
    pub fn new(x: usize, y: usize, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            score: ScoreBreakdown::default(),
        }
    }

    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (cx, cy) = (self.x as f64, self.y as f64);
        !(cx > x || x >= cx + self.width || cy > y || y >= cy + self.height)
    }
}

/// Bump around the rule-of-thirds line for a mirrored coordinate in `[0, 2]`.
#[inline]
pub fn thirds(v: f64) -> f64 {
    let t = ((v - 1.0 / 3.0 + 1.0) % 2.0 * 0.5 - 0.5) * 16.0;
    (1.0 - t * t).max(0.0)
}

/// Spatial weight of the sample point `(x, y)` for `crop`.
///
/// Constant `outsideImportance` outside; inside, a radial falloff from the
/// center with an edge penalty and a rule-of-thirds bonus.
pub fn importance(props: &Properties, crop: &Crop, x: f64, y: f64) -> f64 {
    if !crop.contains(x, y) {
        return props.outside_importance;
    }
    let x = (x - crop.x as f64) / crop.width;
    let y = (y - crop.y as f64) / crop.height;
    let px = (0.5 - x).abs() * 2.0;
    let py = (0.5 - y).abs() * 2.0;

    let dx = (px - 1.0 + props.edge_radius).max(0.0);
    let dy = (py - 1.0 + props.edge_radius).max(0.0);
    let d = (dx * dx + dy * dy) * props.edge_weight;

    let mut s = std::f64::consts::SQRT_2 - (px * px + py * py).sqrt();
    s += (s + d + 0.5).max(0.0) * 1.2 * (thirds(px) + thirds(py));
    s + d
}

/// Scores `crop` against the reduced buffer.
///
/// Each reduced cell is sampled at its full-resolution origin. The saturation
/// term is not importance-weighted.
pub fn score(props: &Properties, reduced: &ReducedBuffer, crop: &Crop) -> ScoreBreakdown {
    let mut result = ScoreBreakdown::default();
    let down_sample = props.score_down_sample as usize;

    for cy in 0..reduced.height() {
        for cx in 0..reduced.width() {
            let i = importance(
                props,
                crop,
                (cx * down_sample) as f64,
                (cy * down_sample) as f64,
            );
            let detail = reduced.get(cx, cy, AnalysisChannel::Detail) / 255.0;
            result.detail += detail * i;
            result.skin +=
                reduced.get(cx, cy, AnalysisChannel::Skin) / 255.0 * (detail + props.skin_bias) * i;
            result.saturation += reduced.get(cx, cy, AnalysisChannel::Saturation) / 255.0
                * (detail + props.saturation_bias);
            result.boost += reduced.get(cx, cy, AnalysisChannel::Boost) / 255.0 * i;
        }
    }

    result.total = (result.detail * props.detail_weight
        + result.skin * props.skin_weight
        + result.saturation * props.saturation_weight
        + result.boost * props.boost_weight)
        / (crop.width * crop.height);
    result
}
