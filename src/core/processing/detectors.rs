use ndarray::Zip;
use tracing::debug;

use crate::core::params::Properties;
use crate::core::processing::buffer::{AnalysisBuffer, PixelBuffer};
use crate::types::AnalysisChannel;

/// Fixed-weight brightness used by every detector.
///
/// The weights sum to 1.3, so a white pixel has a luma of 331.5.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.0722 * r as f64 + 0.7152 * g as f64 + 0.5126 * b as f64
}

#[inline]
fn luma_at(input: &PixelBuffer, x: usize, y: usize) -> f64 {
    let (r, g, b) = input.rgb(x, y);
    luma(r, g, b)
}

/// `1 - distance` between the pixel's normalized RGB direction and the
/// reference skin color.
///
/// Pure black has no direction; it scores 0 rather than NaN, which has the
/// same effect downstream (it never passes the threshold).
#[inline]
pub fn skin_likelihood(skin_color: &[f64; 3], r: u8, g: u8, b: u8) -> f64 {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let mag = (r * r + g * g + b * b).sqrt();
    if mag == 0.0 {
        return 0.0;
    }
    let rd = r / mag - skin_color[0];
    let gd = g / mag - skin_color[1];
    let bd = b / mag - skin_color[2];
    1.0 - (rd * rd + gd * gd + bd * bd).sqrt()
}

/// HSL saturation of an 8-bit RGB triple.
#[inline]
pub fn saturation(r: u8, g: u8, b: u8) -> f64 {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let maximum = r.max(g).max(b);
    let minimum = r.min(g).min(b);
    if maximum == minimum {
        return 0.0;
    }
    let l = (maximum + minimum) / 2.0;
    let d = maximum - minimum;
    if l > 0.5 {
        d / (2.0 - maximum - minimum)
    } else {
        d / (maximum + minimum)
    }
}

/// Writes the detail channel: luma on the one-pixel border, a 4-neighbour
/// Laplacian of luma everywhere else. Reads only `input`.
pub fn edge_detect(input: &PixelBuffer, output: &mut AnalysisBuffer) {
    let w = input.width();
    let h = input.height();

    Zip::indexed(output.channel_mut(AnalysisChannel::Detail)).par_for_each(|(y, x), out| {
        let lightness = luma_at(input, x, y);
        *out = if x == 0 || x >= w - 1 || y == 0 || y >= h - 1 {
            lightness
        } else {
            lightness * 4.0
                - luma_at(input, x, y - 1)
                - luma_at(input, x - 1, y)
                - luma_at(input, x + 1, y)
                - luma_at(input, x, y + 1)
        };
    });
}

/// Writes the skin channel.
pub fn skin_detect(props: &Properties, input: &PixelBuffer, output: &mut AnalysisBuffer) {
    let threshold = props.skin_threshold;
    let gain = 255.0 / (1.0 / threshold);

    Zip::indexed(output.channel_mut(AnalysisChannel::Skin)).par_for_each(|(y, x), out| {
        let (r, g, b) = input.rgb(x, y);
        let lightness = luma(r, g, b) / 255.0;
        let skin = skin_likelihood(&props.skin_color, r, g, b);
        let is_skin_color = skin > threshold;
        let is_skin_brightness =
            lightness >= props.skin_brightness_min && lightness <= props.skin_brightness_max;
        *out = if is_skin_color && is_skin_brightness {
            (skin - threshold) * gain
        } else {
            0.0
        };
    });
}

/// Writes the saturation channel.
pub fn saturation_detect(props: &Properties, input: &PixelBuffer, output: &mut AnalysisBuffer) {
    let threshold = props.saturation_threshold;
    let gain = 255.0 / (1.0 - threshold);

    Zip::indexed(output.channel_mut(AnalysisChannel::Saturation)).par_for_each(|(y, x), out| {
        let (r, g, b) = input.rgb(x, y);
        let lightness = luma(r, g, b) / 255.0;
        let sat = saturation(r, g, b);
        let acceptable_saturation = sat > threshold;
        let acceptable_lightness = lightness >= props.saturation_brightness_min
            && lightness <= props.saturation_brightness_max;
        *out = if acceptable_saturation && acceptable_lightness {
            (sat - threshold) * gain
        } else {
            0.0
        };
    });
}

/// Runs all detectors into a fresh analysis buffer. The boost channel stays zero.
pub fn detect_features(props: &Properties, input: &PixelBuffer) -> AnalysisBuffer {
    let mut output = AnalysisBuffer::zeros(input.width(), input.height());
    edge_detect(input, &mut output);
    skin_detect(props, input, &mut output);
    saturation_detect(props, input, &mut output);
    debug!(
        "Feature maps computed for {}x{} buffer",
        input.width(),
        input.height()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_with_black_center() -> PixelBuffer {
        let mut bytes = vec![255u8; 3 * 3 * 4];
        let center = (3 + 1) * 4;
        bytes[center..center + 3].copy_from_slice(&[0, 0, 0]);
        PixelBuffer::new(3, 3, bytes).unwrap()
    }

    #[test]
    fn luma_uses_fixed_weights() {
        assert_eq!(luma(0, 0, 0), 0.0);
        assert!((luma(255, 255, 255) - 331.5).abs() < 1e-9);
        assert!((luma(100, 0, 0) - 7.22).abs() < 1e-9);
    }

    #[test]
    fn edge_detector_border_and_laplacian() {
        let input = white_with_black_center();
        let mut out = AnalysisBuffer::zeros(3, 3);
        edge_detect(&input, &mut out);

        let white = luma(255, 255, 255);
        let center = out.get(1, 1, AnalysisChannel::Detail);
        assert!((center - (4.0 * luma(0, 0, 0) - 4.0 * white)).abs() < 1e-9);
        assert!((center + 1326.0).abs() < 1e-9);

        for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)] {
            assert_eq!(out.get(x, y, AnalysisChannel::Detail), white);
        }
    }

    #[test]
    fn edge_detector_is_flat_inside_uniform_image() {
        let input = PixelBuffer::filled(5, 5, [90, 90, 90, 255]).unwrap();
        let mut out = AnalysisBuffer::zeros(5, 5);
        edge_detect(&input, &mut out);
        assert!(out.get(2, 2, AnalysisChannel::Detail).abs() < 1e-9);
        assert_eq!(out.get(0, 3, AnalysisChannel::Detail), luma(90, 90, 90));
    }

    #[test]
    fn skin_tone_pixel_is_detected() {
        let props = Properties::default();
        let input = PixelBuffer::filled(2, 2, [200, 146, 113, 255]).unwrap();
        let out = detect_features(&props, &input);
        let skin = out.get(0, 0, AnalysisChannel::Skin);
        let likelihood = skin_likelihood(&props.skin_color, 200, 146, 113);
        assert!(likelihood > props.skin_threshold);
        assert!((skin - (likelihood - 0.8) * 204.0).abs() < 1e-9);
    }

    #[test]
    fn skin_outside_brightness_window_is_dropped() {
        let props = Properties::default();
        // Skin-colored but darker than skinBrightnessMin (luma/255 ~ 0.137)
        let dark = PixelBuffer::filled(2, 2, [40, 29, 22, 255]).unwrap();
        assert!(skin_likelihood(&props.skin_color, 40, 29, 22) > props.skin_threshold);
        assert!(luma(40, 29, 22) / 255.0 < props.skin_brightness_min);
        let out = detect_features(&props, &dark);
        assert_eq!(out.get(0, 0, AnalysisChannel::Skin), 0.0);

        let widened =
            Properties::from_overrides(serde_json::json!({ "skinBrightnessMin": 0.1 }).as_object().unwrap())
                .unwrap();
        let out = detect_features(&widened, &dark);
        assert!(out.get(0, 0, AnalysisChannel::Skin) > 0.0);

        // Bright skin tone (luma/255 ~ 0.693) above a lowered ceiling
        let capped =
            Properties::from_overrides(serde_json::json!({ "skinBrightnessMax": 0.5 }).as_object().unwrap())
                .unwrap();
        let bright = PixelBuffer::filled(2, 2, [200, 146, 113, 255]).unwrap();
        let out = detect_features(&capped, &bright);
        assert_eq!(out.get(1, 1, AnalysisChannel::Skin), 0.0);
    }

    #[test]
    fn black_pixel_has_no_skin_and_does_not_panic() {
        let props = Properties::default();
        assert_eq!(skin_likelihood(&props.skin_color, 0, 0, 0), 0.0);
        let input = PixelBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
        let out = detect_features(&props, &input);
        assert_eq!(out.get(1, 1, AnalysisChannel::Skin), 0.0);
    }

    #[test]
    fn gray_has_no_saturation_or_skin() {
        let props = Properties::default();
        let input = PixelBuffer::filled(3, 3, [128, 128, 128, 255]).unwrap();
        let out = detect_features(&props, &input);
        assert_eq!(out.get(1, 1, AnalysisChannel::Saturation), 0.0);
        assert_eq!(out.get(1, 1, AnalysisChannel::Skin), 0.0);
        assert_eq!(out.get(1, 1, AnalysisChannel::Boost), 0.0);
    }

    #[test]
    fn saturation_matches_hsl() {
        assert_eq!(saturation(255, 0, 0), 1.0);
        assert_eq!(saturation(10, 10, 10), 0.0);
        // l = (1 + 0.5) / 2 > 0.5 -> d / (2 - max - min)
        let s = saturation(255, 255, 128);
        let (max, min) = (1.0, 128.0 / 255.0);
        assert!((s - (max - min) / (2.0 - max - min)).abs() < 1e-12);
    }

    #[test]
    fn saturated_red_fills_channel() {
        let props = Properties::default();
        let input = PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap();
        let out = detect_features(&props, &input);
        // (1 - 0.4) * 255 / 0.6
        assert!((out.get(1, 1, AnalysisChannel::Saturation) - 255.0).abs() < 1e-9);
    }

    #[test]
    fn saturation_respects_brightness_window() {
        let props = Properties::default();
        // Pure blue: luma/255 = 0.5126, inside the window
        let blue = PixelBuffer::filled(1, 1, [0, 0, 255, 255]).unwrap();
        assert!(detect_features(&props, &blue).get(0, 0, AnalysisChannel::Saturation) > 0.0);
        // Very dark red: luma/255 = 0.0722 * 20 / 255 < 0.05
        let dark = PixelBuffer::filled(1, 1, [20, 0, 0, 255]).unwrap();
        assert_eq!(
            detect_features(&props, &dark).get(0, 0, AnalysisChannel::Saturation),
            0.0
        );
    }
}
