use ndarray::{Axis, Zip};
use tracing::debug;

use crate::core::processing::buffer::{AnalysisBuffer, ReducedBuffer};
use crate::types::AnalysisChannel;

/// Block-reduces `input` by `factor` into a `floor(w/factor) x floor(h/factor)` map.
///
/// Skin blends `0.5*mean + 0.5*max` and detail `0.7*mean + 0.3*max` so small,
/// strong patches survive the averaging; saturation and boost keep the plain
/// mean. The running max starts at zero. Remainder columns and rows on the
/// right and bottom edges are dropped.
pub fn downsample(input: &AnalysisBuffer, factor: usize) -> ReducedBuffer {
    let factor = factor.max(1);
    let width = input.width() / factor;
    let height = input.height() / factor;
    let inv_area = 1.0 / (factor * factor) as f64;
    let src = input.inner();

    let mut output = ReducedBuffer::zeros(width, height);
    Zip::indexed(output.inner_mut().lanes_mut(Axis(2))).par_for_each(|(y, x), mut cell| {
        let (mut r, mut g, mut b, mut a) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
        let (mut mr, mut mg) = (0.0f64, 0.0f64);
        for v in 0..factor {
            for u in 0..factor {
                let sy = y * factor + v;
                let sx = x * factor + u;
                let skin = src[(sy, sx, AnalysisChannel::Skin.index())];
                let detail = src[(sy, sx, AnalysisChannel::Detail.index())];
                r += skin;
                g += detail;
                b += src[(sy, sx, AnalysisChannel::Saturation.index())];
                a += src[(sy, sx, AnalysisChannel::Boost.index())];
                mr = mr.max(skin);
                mg = mg.max(detail);
            }
        }
        cell[AnalysisChannel::Skin.index()] = r * inv_area * 0.5 + mr * 0.5;
        cell[AnalysisChannel::Detail.index()] = g * inv_area * 0.7 + mg * 0.3;
        cell[AnalysisChannel::Saturation.index()] = b * inv_area;
        cell[AnalysisChannel::Boost.index()] = a * inv_area;
    });

    debug!(
        "Downsampled {}x{} -> {}x{} (factor {})",
        input.width(),
        input.height(),
        width,
        height,
        factor
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_size_is_floor_division() {
        for (w, h, f) in [(64, 64, 8), (65, 70, 8), (7, 9, 2), (5, 5, 1), (3, 10, 4), (9, 3, 10)] {
            let out = downsample(&AnalysisBuffer::zeros(w, h), f);
            assert_eq!((out.width(), out.height()), (w / f, h / f), "{}x{} / {}", w, h, f);
        }
    }

    #[test]
    fn blends_mean_and_max_per_channel() {
        let mut input = AnalysisBuffer::zeros(2, 2);
        input.set(0, 0, AnalysisChannel::Skin, 100.0);
        input.set(1, 1, AnalysisChannel::Detail, 40.0);
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            input.set(x, y, AnalysisChannel::Saturation, 8.0);
        }
        input.set(1, 0, AnalysisChannel::Boost, 4.0);

        let out = downsample(&input, 2);
        assert_eq!((out.width(), out.height()), (1, 1));
        // skin: mean 25 * 0.5 + max 100 * 0.5
        assert!((out.get(0, 0, AnalysisChannel::Skin) - 62.5).abs() < 1e-12);
        // detail: mean 10 * 0.7 + max 40 * 0.3
        assert!((out.get(0, 0, AnalysisChannel::Detail) - 19.0).abs() < 1e-12);
        assert!((out.get(0, 0, AnalysisChannel::Saturation) - 8.0).abs() < 1e-12);
        assert!((out.get(0, 0, AnalysisChannel::Boost) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn negative_detail_keeps_zero_max() {
        let mut input = AnalysisBuffer::zeros(2, 1);
        input.set(0, 0, AnalysisChannel::Detail, -20.0);
        input.set(1, 0, AnalysisChannel::Detail, -20.0);
        let out = downsample(&input, 1);
        // 1x1 blocks: 0.7 * -20 + 0.3 * max(0, -20)
        assert!((out.get(0, 0, AnalysisChannel::Detail) + 14.0).abs() < 1e-12);
    }

    #[test]
    fn remainder_pixels_are_ignored() {
        let mut input = AnalysisBuffer::zeros(3, 3);
        input.set(2, 2, AnalysisChannel::Saturation, 255.0);
        input.set(2, 0, AnalysisChannel::Saturation, 255.0);
        let out = downsample(&input, 2);
        assert_eq!(out.get(0, 0, AnalysisChannel::Saturation), 0.0);
    }
}
